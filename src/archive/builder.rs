use crate::archive::copy::{copy_lump, seek_to_lump, DEFAULT_BUFFER_SIZE};
use crate::archive::format::{DirectoryEntry, WadHeader, WadType, HEADER_SIZE};
use crate::config::EditorConfig;
use crate::error::{Result, WadError};
use crate::table::{LumpSource, LumpTable};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Serializes a [`LumpTable`] into a brand-new archive file
///
/// The build runs in two passes against the destination: lump payloads are
/// copied in table order behind a placeholder header, then the directory is
/// appended and the header is rewritten with the real directory offset.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    wad_type: WadType,
    buffer_size: usize,
}

impl ArchiveBuilder {
    /// Builder writing `IWAD` archives with the default copy buffer
    pub fn new() -> Self {
        Self {
            wad_type: WadType::Iwad,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Builder following `config`, for a table loaded from an archive tagged `original`
    pub fn from_config(config: &EditorConfig, original: Option<WadType>) -> Self {
        Self {
            wad_type: config.type_tag.resolve(original),
            buffer_size: config.copy_buffer_size.max(1),
        }
    }

    pub fn with_type(mut self, wad_type: WadType) -> Self {
        self.wad_type = wad_type;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn wad_type(&self) -> WadType {
        self.wad_type
    }

    /// Write `table` to `destination`
    ///
    /// Archive-backed lumps are read from `original`. The destination may be
    /// neither `original` nor any staged lump file. On success the table's
    /// working offsets are updated to their positions in the new file and the
    /// written header is returned. On failure the table is unchanged, but the
    /// destination may hold partial bytes that the caller must remove.
    pub fn build(
        &self,
        table: &mut LumpTable,
        original: Option<&Path>,
        destination: &Path,
    ) -> Result<WadHeader> {
        if let Some(original) = original {
            if same_file(original, destination) {
                return Err(WadError::SelfOverwrite(destination.to_path_buf()));
            }
        }
        // Creating the destination truncates it, so no staged lump may live there
        for item in table.iter() {
            if let LumpSource::ExternalFile { path } = &item.source {
                if same_file(path, destination) {
                    return Err(WadError::SelfOverwrite(destination.to_path_buf()));
                }
            }
        }

        let lump_count =
            i32::try_from(table.len()).map_err(|_| WadError::ArchiveTooLarge(table.len() as u64))?;

        // Resolve the archive before the destination is truncated
        let needs_archive = table
            .iter()
            .find(|item| matches!(item.source, LumpSource::ArchiveBacked { .. }));
        let mut archive = match (needs_archive, original) {
            (None, _) => None,
            (Some(item), None) => return Err(WadError::MissingArchive(item.entry.name.to_string())),
            (Some(_), Some(path)) => Some(File::open(path).map_err(|source| WadError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?),
        };

        info!(
            "Building {} with {} lumps ({})",
            destination.display(),
            lump_count,
            self.wad_type
        );

        let file = File::create(destination).map_err(|source| WadError::FileOpen {
            path: destination.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        // Placeholder header; the directory offset is backpatched at the end
        let mut header = WadHeader {
            wad_type: self.wad_type,
            lump_count,
            directory_offset: 0,
        };
        header.write_to(&mut writer)?;
        let mut current_offset = HEADER_SIZE as u64;

        let mut buf = vec![0u8; self.buffer_size];
        let mut offsets = Vec::with_capacity(table.len());

        for item in table.iter() {
            let name = item.entry.name.to_string();
            let candidate = to_offset(current_offset)?;
            let size = u64::try_from(item.entry.size).map_err(|_| WadError::CopyMismatch {
                name: name.clone(),
                expected: i64::from(item.entry.size),
                actual: 0,
            })?;

            let copied = match &item.source {
                LumpSource::ArchiveBacked { offset } => {
                    // Resolved above: every archive-backed table has an open archive here
                    let Some(src) = archive.as_mut() else {
                        return Err(WadError::MissingArchive(name));
                    };
                    seek_to_lump(src, *offset)?;
                    copy_lump(src, &mut writer, &name, size, &mut buf)?
                }
                LumpSource::ExternalFile { path } => {
                    let mut src = File::open(path).map_err(|source| WadError::SourceOpen {
                        path: path.clone(),
                        source,
                    })?;
                    if let Ok(metadata) = src.metadata() {
                        if metadata.len() > size {
                            warn!(
                                "{} grew to {} bytes since it was staged, copying the first {}",
                                path.display(),
                                metadata.len(),
                                size
                            );
                        }
                    }
                    copy_lump(&mut src, &mut writer, &name, size, &mut buf)?
                }
            };

            current_offset += copied;
            offsets.push(if size == 0 { 0 } else { candidate });
        }

        // Release the source archive as soon as the payload pass is done
        drop(archive);

        header.directory_offset = to_offset(current_offset)?;
        for (item, &offset) in table.iter().zip(&offsets) {
            DirectoryEntry {
                offset,
                ..item.entry
            }
            .write_to(&mut writer)?;
        }

        writer.flush()?;
        let mut file = writer.into_inner().map_err(|e| e.into_error())?;

        file.seek(SeekFrom::Start(0))?;
        header.write_to(&mut file)?;
        file.flush()?;

        table.commit_offsets(&offsets);

        debug!(
            "Wrote {} lumps to {}, directory at {}",
            lump_count,
            destination.display(),
            header.directory_offset
        );
        Ok(header)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn to_offset(position: u64) -> Result<i32> {
    i32::try_from(position).map_err(|_| WadError::ArchiveTooLarge(position))
}

/// True if both paths name the same file on disk
///
/// Paths that cannot be canonicalized (for example a destination that does
/// not exist yet) only match when they are literally equal.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
