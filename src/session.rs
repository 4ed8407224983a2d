//! Editing session: the lump table plus the archive it came from
//!
//! [`WadSession`] is what a front end talks to. Every command runs to
//! completion or returns an error; mutations that fail leave the session as
//! it was.

use crate::archive::builder::same_file;
use crate::archive::copy::{copy_lump, seek_to_lump};
use crate::archive::{ArchiveBuilder, LumpName, WadHeader, WadReader, WadType};
use crate::config::EditorConfig;
use crate::error::{Result, WadError};
use crate::table::{Direction, LumpSource, LumpTable};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One row of the lump list as shown to a front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LumpListing {
    pub index: usize,
    pub name: String,
    pub size: i32,
    pub offset: i32,
    /// "archive" or the path of the staged file
    pub source: String,
}

#[derive(Debug, Default)]
pub struct WadSession {
    table: LumpTable,
    archive_path: Option<PathBuf>,
    archive_type: Option<WadType>,
    config: EditorConfig,
}

impl WadSession {
    /// Empty session for a new, unsaved archive
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Path of the loaded archive, `None` for a new archive
    pub fn archive_path(&self) -> Option<&Path> {
        self.archive_path.as_deref()
    }

    /// Type tag of the loaded archive
    pub fn archive_type(&self) -> Option<WadType> {
        self.archive_type
    }

    pub fn table(&self) -> &LumpTable {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Load the archive at `path`, replacing the current lumps
    ///
    /// Returns the number of lumps loaded.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let mut reader = WadReader::open(path.as_ref())?;
        let mut table = LumpTable::new();
        table.load_from(&mut reader)?;

        info!(
            "Loaded {} ({}, {} lumps)",
            reader.path().display(),
            reader.wad_type(),
            table.len()
        );

        self.table = table;
        self.archive_type = Some(reader.wad_type());
        self.archive_path = Some(reader.path().to_path_buf());
        Ok(self.table.len())
    }

    /// Current lumps in archive order
    pub fn list_lumps(&self) -> Vec<LumpListing> {
        self.table
            .iter()
            .enumerate()
            .map(|(index, item)| LumpListing {
                index,
                name: item.entry.name.to_string(),
                size: item.entry.size,
                offset: item.entry.offset,
                source: item.source_label(),
            })
            .collect()
    }

    /// The lump list as pretty-printed JSON
    pub fn listing_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.list_lumps())?)
    }

    /// Stage an external file as the last lump
    pub fn add_lump<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.table.add_external(path)
    }

    /// Stage an external file before the lump at `index`
    pub fn insert_lump<P: AsRef<Path>>(&mut self, index: usize, path: P) -> Result<usize> {
        self.table.insert_external(index, path)
    }

    pub fn delete_lumps(&mut self, indices: &[usize]) -> Result<usize> {
        self.table.delete(indices)
    }

    pub fn move_lump(&mut self, index: usize, direction: Direction) -> Result<usize> {
        self.table.move_item(index, direction)
    }

    /// Move a multi-selection one step; returns the new selection
    pub fn move_lumps(&mut self, indices: &[usize], direction: Direction) -> Result<Vec<usize>> {
        self.table.move_selection(indices, direction)
    }

    pub fn rename_lump(&mut self, index: usize, name: &str) -> Result<LumpName> {
        self.table.rename(index, name)
    }

    /// Drop every lump and forget the loaded archive
    pub fn clear(&mut self) {
        self.table.clear();
        self.archive_path = None;
        self.archive_type = None;
        debug!("Session cleared");
    }

    /// Write the current lumps to `destination`
    ///
    /// The loaded archive stays the source of archive-backed lumps after a
    /// save, so saving again (to any other path) is always possible.
    pub fn save<P: AsRef<Path>>(&mut self, destination: P) -> Result<WadHeader> {
        let destination = destination.as_ref();
        self.check_not_archive(destination)?;

        if !self.config.allow_overwrite && destination.exists() {
            return Err(WadError::DestinationExists(destination.to_path_buf()));
        }

        let builder = ArchiveBuilder::from_config(&self.config, self.archive_type);
        builder.build(&mut self.table, self.archive_path.as_deref(), destination)
    }

    /// Copy the bytes of the lump at `index` into a new file
    ///
    /// Returns the number of bytes written.
    pub fn extract_lump<P: AsRef<Path>>(&self, index: usize, destination: P) -> Result<u64> {
        let destination = destination.as_ref();
        let item = self.table.get(index).ok_or(WadError::IndexOutOfRange {
            index,
            len: self.table.len(),
        })?;
        let name = item.entry.name.to_string();

        self.check_not_archive(destination)?;
        if let LumpSource::ExternalFile { path } = &item.source {
            if same_file(path, destination) {
                return Err(WadError::SelfOverwrite(destination.to_path_buf()));
            }
        }
        if !self.config.allow_overwrite && destination.exists() {
            return Err(WadError::DestinationExists(destination.to_path_buf()));
        }

        let size = u64::try_from(item.entry.size).map_err(|_| WadError::CopyMismatch {
            name: name.clone(),
            expected: i64::from(item.entry.size),
            actual: 0,
        })?;

        let mut src = match &item.source {
            LumpSource::ArchiveBacked { offset } => {
                let archive = self
                    .archive_path
                    .as_deref()
                    .ok_or_else(|| WadError::MissingArchive(name.clone()))?;
                let mut file = File::open(archive).map_err(|source| WadError::FileOpen {
                    path: archive.to_path_buf(),
                    source,
                })?;
                seek_to_lump(&mut file, *offset)?;
                file
            }
            LumpSource::ExternalFile { path } => {
                File::open(path).map_err(|source| WadError::SourceOpen {
                    path: path.clone(),
                    source,
                })?
            }
        };

        let file = File::create(destination).map_err(|source| WadError::FileOpen {
            path: destination.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        let mut buf = vec![0u8; self.config.copy_buffer_size];
        let copied = copy_lump(&mut src, &mut writer, &name, size, &mut buf)?;
        writer.flush()?;

        debug!("Extracted {} ({} bytes) to {}", name, copied, destination.display());
        Ok(copied)
    }

    fn check_not_archive(&self, destination: &Path) -> Result<()> {
        match self.archive_path.as_deref() {
            Some(archive) if same_file(archive, destination) => {
                Err(WadError::SelfOverwrite(destination.to_path_buf()))
            }
            _ => Ok(()),
        }
    }
}
