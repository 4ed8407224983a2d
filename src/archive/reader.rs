use crate::archive::copy::seek_to_lump;
use crate::archive::format::{DirectoryEntry, WadHeader, WadType, DENTRY_SIZE};
use crate::error::{Result, WadError};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Archive reader over a WAD file on disk
///
/// The header is parsed on [`open`](Self::open); the directory is read lazily
/// through [`entries`](Self::entries) or entry by entry.
pub struct WadReader {
    file: File,
    path: PathBuf,
    header: WadHeader,
    file_len: u64,
}

impl WadReader {
    /// Open an archive file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path).map_err(|source| WadError::FileOpen {
            path: path.clone(),
            source,
        })?;
        let file_len = file.metadata()?.len();

        let header = WadHeader::read_from(&mut file)?;

        if !header.wad_type.is_recognized() {
            warn!(
                "Unrecognized archive tag {} in {}, reading anyway",
                header.wad_type,
                path.display()
            );
        }
        if header.lump_count < 0 {
            warn!("Negative lump count {} in {}", header.lump_count, path.display());
        } else if header.directory_end() > file_len as i64 {
            warn!(
                "Directory of {} ends at {} past end of file ({} bytes)",
                path.display(),
                header.directory_end(),
                file_len
            );
        }

        debug!(
            "Opened {} ({}, {} lumps, directory at {})",
            path.display(),
            header.wad_type,
            header.lump_count,
            header.directory_offset
        );

        Ok(Self {
            file,
            path,
            header,
            file_len,
        })
    }

    /// Get archive header information
    pub fn header(&self) -> &WadHeader {
        &self.header
    }

    pub fn wad_type(&self) -> WadType {
        self.header.wad_type
    }

    /// Number of directory entries; a negative header count reads as zero
    pub fn lump_count(&self) -> usize {
        usize::try_from(self.header.lump_count).unwrap_or(0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Archive length in bytes at open time
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Position the cursor on the first directory entry
    pub fn seek_to_directory(&mut self) -> Result<()> {
        let offset = i64::from(self.header.directory_offset);
        let target = u64::try_from(offset).map_err(|_| WadError::FileSeek { offset })?;
        if target > self.file_len {
            return Err(WadError::FileSeek { offset });
        }

        let landed = self
            .file
            .seek(SeekFrom::Start(target))
            .map_err(|_| WadError::FileSeek { offset })?;
        if landed != target {
            return Err(WadError::FileSeek { offset });
        }
        Ok(())
    }

    /// Read the directory entry under the cursor
    ///
    /// There is no end-of-directory marker: the caller reads exactly
    /// [`lump_count`](Self::lump_count) entries after
    /// [`seek_to_directory`](Self::seek_to_directory).
    pub fn read_next_entry(&mut self) -> Result<DirectoryEntry> {
        DirectoryEntry::read_from(&mut self.file)
    }

    /// Lazily iterate the directory from its first entry
    ///
    /// Each call seeks back to the directory start, so the sequence can be
    /// restarted any number of times.
    pub fn entries(&mut self) -> Result<Entries<'_>> {
        self.seek_to_directory()?;
        let remaining = self.lump_count();
        Ok(Entries {
            reader: self,
            remaining,
        })
    }

    /// Read the whole directory into memory
    pub fn read_directory(&mut self) -> Result<Vec<DirectoryEntry>> {
        // Never trust the header count for the allocation
        let fits = (self.file_len / DENTRY_SIZE as u64) as usize;
        let mut directory = Vec::with_capacity(self.lump_count().min(fits));
        for entry in self.entries()? {
            directory.push(entry?);
        }
        Ok(directory)
    }

    /// Read one lump's bytes
    pub fn read_lump(&mut self, entry: &DirectoryEntry) -> Result<Vec<u8>> {
        let offset = i64::from(entry.offset);
        let start = u64::try_from(offset).map_err(|_| WadError::FileSeek { offset })?;
        let size = u64::try_from(entry.size)
            .map_err(|_| WadError::FileRead(format!("lump {} has negative size", entry.name)))?;

        if size == 0 {
            return Ok(Vec::new());
        }
        if start + size > self.file_len {
            return Err(WadError::FileRead(format!(
                "lump {} ({} bytes at {}) extends past end of file",
                entry.name, size, start
            )));
        }

        seek_to_lump(&mut self.file, entry.offset)?;
        let mut data = vec![0u8; size as usize];
        self.file
            .read_exact(&mut data)
            .map_err(|e| WadError::FileRead(format!("lump {}: {}", entry.name, e)))?;
        Ok(data)
    }
}

/// Lazy directory iterator returned by [`WadReader::entries`]
pub struct Entries<'a> {
    reader: &'a mut WadReader,
    remaining: usize,
}

impl Iterator for Entries<'_> {
    type Item = Result<DirectoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        match self.reader.read_next_entry() {
            Ok(entry) => {
                self.remaining -= 1;
                Some(Ok(entry))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::name::LumpName;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// PWAD with LUMPA (6 bytes at 12) and LUMPB (10 bytes at 18), directory at 28
    fn two_lump_wad() -> NamedTempFile {
        let mut bytes = Vec::new();
        WadHeader {
            wad_type: WadType::Pwad,
            lump_count: 2,
            directory_offset: 28,
        }
        .write_to(&mut bytes)
        .unwrap();
        bytes.extend_from_slice(b"aaaaaa");
        bytes.extend_from_slice(b"bbbbbbbbbb");
        DirectoryEntry::new(LumpName::new("LUMPA"), 12, 6)
            .write_to(&mut bytes)
            .unwrap();
        DirectoryEntry::new(LumpName::new("LUMPB"), 18, 10)
            .write_to(&mut bytes)
            .unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_and_read_directory() {
        let wad = two_lump_wad();
        let mut reader = WadReader::open(wad.path()).unwrap();

        assert_eq!(reader.wad_type(), WadType::Pwad);
        assert_eq!(reader.lump_count(), 2);

        let directory = reader.read_directory().unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory[0].name, "LUMPA");
        assert_eq!(directory[1].offset, 18);
        assert_eq!(directory[1].size, 10);
    }

    #[test]
    fn test_entries_restartable() {
        let wad = two_lump_wad();
        let mut reader = WadReader::open(wad.path()).unwrap();

        let first: Vec<_> = reader.entries().unwrap().map(|e| e.unwrap()).collect();
        let second: Vec<_> = reader.entries().unwrap().map(|e| e.unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_manual_entry_reads() {
        let wad = two_lump_wad();
        let mut reader = WadReader::open(wad.path()).unwrap();

        reader.seek_to_directory().unwrap();
        let a = reader.read_next_entry().unwrap();
        let b = reader.read_next_entry().unwrap();
        assert_eq!(a.name, "LUMPA");
        assert_eq!(b.name, "LUMPB");

        // Past the directory there is nothing left to read
        assert!(matches!(reader.read_next_entry(), Err(WadError::FileRead(_))));
    }

    #[test]
    fn test_read_lump() {
        let wad = two_lump_wad();
        let mut reader = WadReader::open(wad.path()).unwrap();
        let directory = reader.read_directory().unwrap();

        assert_eq!(reader.read_lump(&directory[0]).unwrap(), b"aaaaaa");
        assert_eq!(reader.read_lump(&directory[1]).unwrap(), b"bbbbbbbbbb");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = WadReader::open(dir.path().join("nope.wad"));
        assert!(matches!(result, Err(WadError::FileOpen { .. })));
    }
}
