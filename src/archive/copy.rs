//! Chunked, byte-count-exact stream copy

use crate::error::{Result, WadError};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// Default size of the intermediate copy buffer
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Copy exactly `expected` bytes of lump `name` from `src` to `dest`
///
/// Data moves through `buf` one chunk at a time. Running out of source bytes
/// before `expected` is reached is a [`WadError::CopyMismatch`].
pub fn copy_lump<R: Read, W: Write>(
    src: &mut R,
    dest: &mut W,
    name: &str,
    expected: u64,
    buf: &mut [u8],
) -> Result<u64> {
    debug_assert!(!buf.is_empty());

    let mut copied = 0u64;
    while copied < expected {
        let want = (expected - copied).min(buf.len() as u64) as usize;
        let read = match src.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        dest.write_all(&buf[..read])?;
        copied += read as u64;
    }

    if copied != expected {
        return Err(WadError::CopyMismatch {
            name: name.to_string(),
            expected: expected as i64,
            actual: copied,
        });
    }
    Ok(copied)
}

/// Position `src` at a lump's directory offset
///
/// Negative offsets, seek errors and short landings are all `FileSeek`.
pub fn seek_to_lump<S: Seek>(src: &mut S, offset: i32) -> Result<()> {
    let offset = i64::from(offset);
    let start = u64::try_from(offset).map_err(|_| WadError::FileSeek { offset })?;
    let landed = src
        .seek(SeekFrom::Start(start))
        .map_err(|_| WadError::FileSeek { offset })?;
    if landed != start {
        return Err(WadError::FileSeek { offset });
    }
    Ok(())
}
