//! Lump names and the display-name sanitizer

use crate::archive::format::MAX_NAME_LENGTH;
use std::borrow::Cow;
use std::fmt;

/// An 8-byte, NUL-padded lump name
///
/// Names read from an archive keep their raw bytes up to the first NUL;
/// everything after it is zeroed. Names built with [`sanitize`] only ever
/// contain `A-Z`, `0-9`, `[`, `]`, `-` and `_`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LumpName([u8; MAX_NAME_LENGTH]);

impl LumpName {
    /// Build a name from the raw directory field, truncating at the first NUL
    pub fn from_raw(raw: [u8; MAX_NAME_LENGTH]) -> Self {
        let mut name = [0u8; MAX_NAME_LENGTH];
        let len = raw.iter().position(|&b| b == 0).unwrap_or(MAX_NAME_LENGTH);
        name[..len].copy_from_slice(&raw[..len]);
        Self(name)
    }

    /// Sanitize an arbitrary display string into a lump name
    pub fn new(display: &str) -> Self {
        sanitize(display)
    }

    /// The directory field as written to disk
    pub fn to_raw(&self) -> [u8; MAX_NAME_LENGTH] {
        self.0
    }

    /// Name bytes without padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..self.len()]
    }

    pub fn len(&self) -> usize {
        self.0.iter().position(|&b| b == 0).unwrap_or(MAX_NAME_LENGTH)
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Name as text (lossy for non-UTF-8 bytes read from foreign archives)
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl fmt::Display for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl fmt::Debug for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LumpName({:?})", self.as_str())
    }
}

impl PartialEq<str> for LumpName {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for LumpName {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Map a display string to a valid lump name
///
/// Letters are uppercased; digits and `[ ] - _` pass through; every other
/// character is skipped without using an output slot. Scanning stops once
/// eight characters have been produced.
pub fn sanitize(input: &str) -> LumpName {
    let mut name = [0u8; MAX_NAME_LENGTH];
    let mut len = 0;

    for ch in input.chars() {
        if len == MAX_NAME_LENGTH {
            break;
        }
        let byte = match ch {
            'a'..='z' => ch.to_ascii_uppercase() as u8,
            'A'..='Z' | '0'..='9' | '[' | ']' | '-' | '_' => ch as u8,
            _ => continue,
        };
        name[len] = byte;
        len += 1;
    }

    LumpName(name)
}

/// True if `byte` may appear in a sanitized name
pub fn is_valid_name_byte(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'0'..=b'9' | b'[' | b']' | b'-' | b'_')
}
