use crate::archive::name::LumpName;
use crate::error::{Result, WadError};
use std::fmt;
use std::io::{Read, Write};

/// Magic tag of an internal (base game) archive
pub const IWAD_MAGIC: [u8; 4] = *b"IWAD";

/// Magic tag of a patch archive
pub const PWAD_MAGIC: [u8; 4] = *b"PWAD";

/// Header size in bytes
pub const HEADER_SIZE: usize = 12;

/// Directory entry size in bytes
pub const DENTRY_SIZE: usize = 16;

/// Maximum lump name length in bytes
pub const MAX_NAME_LENGTH: usize = 8;

/// Archive type tag stored in the first four header bytes
///
/// Reading is lenient: any four bytes are accepted and surface as
/// [`WadType::Unknown`] when they match neither recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WadType {
    Iwad,
    Pwad,
    Unknown([u8; 4]),
}

impl WadType {
    pub fn from_magic(magic: [u8; 4]) -> Self {
        match magic {
            IWAD_MAGIC => Self::Iwad,
            PWAD_MAGIC => Self::Pwad,
            other => Self::Unknown(other),
        }
    }

    pub fn magic(self) -> [u8; 4] {
        match self {
            Self::Iwad => IWAD_MAGIC,
            Self::Pwad => PWAD_MAGIC,
            Self::Unknown(magic) => magic,
        }
    }

    /// True for `IWAD` and `PWAD`
    pub fn is_recognized(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for WadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iwad => f.write_str("IWAD"),
            Self::Pwad => f.write_str("PWAD"),
            Self::Unknown(magic) => write!(f, "{:?}", String::from_utf8_lossy(magic)),
        }
    }
}

/// Fixed 12-byte header at the beginning of the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadHeader {
    pub wad_type: WadType,
    pub lump_count: i32,
    pub directory_offset: i32,
}

impl WadHeader {
    pub fn new(wad_type: WadType) -> Self {
        Self {
            wad_type,
            lump_count: 0,
            directory_offset: 0,
        }
    }

    /// Byte offset just past the last directory entry
    pub fn directory_end(&self) -> i64 {
        i64::from(self.directory_offset) + i64::from(self.lump_count) * DENTRY_SIZE as i64
    }

    /// Write header to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.wad_type.magic());
        buf[4..8].copy_from_slice(&self.lump_count.to_le_bytes());
        buf[8..12].copy_from_slice(&self.directory_offset.to_le_bytes());
        writer.write_all(&buf)?;
        Ok(())
    }

    /// Read header from a reader
    ///
    /// A short read is a [`WadError::FileRead`]. The magic is not validated.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let buf: [u8; HEADER_SIZE] = read_record(reader, "header")?;

        Ok(Self {
            wad_type: WadType::from_magic(field(&buf, 0)),
            lump_count: i32::from_le_bytes(field(&buf, 4)),
            directory_offset: i32::from_le_bytes(field(&buf, 8)),
        })
    }
}

impl Default for WadHeader {
    fn default() -> Self {
        Self::new(WadType::Iwad)
    }
}

/// One 16-byte directory record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub offset: i32,
    pub size: i32,
    pub name: LumpName,
}

impl DirectoryEntry {
    pub fn new(name: LumpName, offset: i32, size: i32) -> Self {
        Self { offset, size, name }
    }

    /// Write entry to the directory
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut buf = [0u8; DENTRY_SIZE];
        buf[0..4].copy_from_slice(&self.offset.to_le_bytes());
        buf[4..8].copy_from_slice(&self.size.to_le_bytes());
        buf[8..16].copy_from_slice(&self.name.to_raw());
        writer.write_all(&buf)?;
        Ok(())
    }

    /// Read entry from the directory, normalizing the name to be NUL-terminated
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let buf: [u8; DENTRY_SIZE] = read_record(reader, "directory entry")?;

        Ok(Self {
            offset: i32::from_le_bytes(field(&buf, 0)),
            size: i32::from_le_bytes(field(&buf, 4)),
            name: LumpName::from_raw(field(&buf, 8)),
        })
    }
}

/// Read exactly `N` bytes, reporting a short read as `FileRead`
fn read_record<R: Read, const N: usize>(mut reader: R, what: &str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|e| WadError::FileRead(format!("truncated {}: {}", what, e)))?;
    Ok(buf)
}

fn field<const N: usize>(buf: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[at..at + N]);
    out
}
