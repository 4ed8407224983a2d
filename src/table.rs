//! The editable lump list
//!
//! A [`LumpTable`] is the single source of truth for an archive's contents
//! between load and save. Its order is the archive's lump order and is
//! written out verbatim by the builder.

use crate::archive::name::{sanitize, LumpName};
use crate::archive::{DirectoryEntry, WadReader};
use crate::error::{Result, WadError};
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a lump's bytes currently live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LumpSource {
    /// Still inside the archive the table was loaded from
    ArchiveBacked { offset: i32 },
    /// Staged from a file on disk
    ExternalFile { path: PathBuf },
}

/// One lump: its directory entry plus the location of its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub entry: DirectoryEntry,
    pub source: LumpSource,
}

impl Item {
    /// Item backed by the archive the entry was read from
    pub fn from_entry(entry: DirectoryEntry) -> Self {
        Self {
            source: LumpSource::ArchiveBacked {
                offset: entry.offset,
            },
            entry,
        }
    }

    /// Stage an external file, sizing the lump from the file's current length
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let len = stat_source(&path)?;
        let size = i32::try_from(len).map_err(|_| WadError::LumpTooLarge {
            path: path.clone(),
            len,
        })?;

        let display = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            entry: DirectoryEntry::new(sanitize(&display), 0, size),
            source: LumpSource::ExternalFile { path },
        })
    }

    pub fn name(&self) -> LumpName {
        self.entry.name
    }

    pub fn size(&self) -> i32 {
        self.entry.size
    }

    pub fn is_external(&self) -> bool {
        matches!(self.source, LumpSource::ExternalFile { .. })
    }

    /// "archive" for archive-backed lumps, otherwise the staged path
    pub fn source_label(&self) -> String {
        match &self.source {
            LumpSource::ArchiveBacked { .. } => "archive".to_string(),
            LumpSource::ExternalFile { path } => path.display().to_string(),
        }
    }
}

fn stat_source(path: &Path) -> Result<u64> {
    let metadata = File::open(path)
        .and_then(|file| file.metadata())
        .map_err(|source| WadError::SourceOpen {
            path: path.to_path_buf(),
            source,
        })?;

    if !metadata.is_file() {
        return Err(WadError::SourceOpen {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    Ok(metadata.len())
}

/// Direction of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards index 0
    Up,
    /// Towards the end of the table
    Down,
}

/// Ordered, mutable collection of lumps
#[derive(Debug, Clone, Default)]
pub struct LumpTable {
    items: Vec<Item>,
}

impl LumpTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Index of the first lump called `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.entry.name == name)
    }

    /// Replace the contents with the directory of `reader`
    ///
    /// The whole directory is read before anything is replaced, so a read
    /// failure leaves the table untouched.
    pub fn load_from(&mut self, reader: &mut WadReader) -> Result<()> {
        let directory = reader.read_directory()?;
        self.load_entries(directory);
        Ok(())
    }

    /// Replace the contents with one archive-backed item per entry
    pub fn load_entries<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = DirectoryEntry>,
    {
        self.items = entries.into_iter().map(Item::from_entry).collect();
        debug!("Loaded {} lumps", self.items.len());
    }

    /// Append an external file as a new lump; returns its index
    pub fn add_external<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let len = self.items.len();
        self.insert_external(len, path)
    }

    /// Stage an external file at `index`, shifting later lumps down
    pub fn insert_external<P: AsRef<Path>>(&mut self, index: usize, path: P) -> Result<usize> {
        self.check_position(index)?;
        let item = Item::from_file(path)?;
        debug!(
            "Staged {} as {} ({} bytes) at {}",
            item.source_label(),
            item.entry.name,
            item.entry.size,
            index
        );
        self.items.insert(index, item);
        Ok(index)
    }

    /// Remove every lump in `indices`
    ///
    /// Indices refer to the table as it was before the call; duplicates are
    /// ignored. Survivors keep their relative order. Returns how many lumps
    /// were removed.
    pub fn delete(&mut self, indices: &[usize]) -> Result<usize> {
        let doomed = self.selection(indices)?;
        if doomed.is_empty() {
            return Ok(0);
        }

        let mut position = 0;
        self.items.retain(|_| {
            let keep = !doomed.contains(&position);
            position += 1;
            keep
        });

        debug!("Deleted {} lumps, {} remain", doomed.len(), self.items.len());
        Ok(doomed.len())
    }

    /// Swap the lump at `index` with its neighbor; returns its new index
    ///
    /// Moving the first lump up or the last lump down is a no-op.
    pub fn move_item(&mut self, index: usize, direction: Direction) -> Result<usize> {
        self.check_index(index)?;
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.items.len() => index + 1,
            _ => return Ok(index),
        };
        self.items.swap(index, target);
        Ok(target)
    }

    /// Move every selected lump one step; returns the new selection
    ///
    /// Up scans the selection top to bottom and down scans it bottom to top,
    /// so adjacent selected runs travel together. When any selected lump is
    /// already at the boundary in the move direction, nothing moves.
    pub fn move_selection(&mut self, indices: &[usize], direction: Direction) -> Result<Vec<usize>> {
        let selected = self.selection(indices)?;
        let (Some(&first), Some(&last)) = (selected.first(), selected.last()) else {
            return Ok(Vec::new());
        };

        let pinned = match direction {
            Direction::Up => first == 0,
            Direction::Down => last + 1 == self.items.len(),
        };
        if pinned {
            return Ok(selected.into_iter().collect());
        }

        match direction {
            Direction::Up => {
                for &i in &selected {
                    self.items.swap(i, i - 1);
                }
                Ok(selected.iter().map(|i| i - 1).collect())
            }
            Direction::Down => {
                for &i in selected.iter().rev() {
                    self.items.swap(i, i + 1);
                }
                Ok(selected.iter().map(|i| i + 1).collect())
            }
        }
    }

    /// Rename the lump at `index`; returns the sanitized name
    pub fn rename(&mut self, index: usize, display_name: &str) -> Result<LumpName> {
        self.check_index(index)?;
        let name = sanitize(display_name);
        let item = &mut self.items[index];
        debug!("Renamed lump {} from {} to {}", index, item.entry.name, name);
        item.entry.name = name;
        Ok(name)
    }

    /// Drop every lump
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Install offsets computed by a successful build
    pub(crate) fn commit_offsets(&mut self, offsets: &[i32]) {
        for (item, &offset) in self.items.iter_mut().zip(offsets) {
            item.entry.offset = offset;
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(WadError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn check_position(&self, index: usize) -> Result<()> {
        if index > self.items.len() {
            return Err(WadError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    /// Validated, sorted, de-duplicated selection
    fn selection(&self, indices: &[usize]) -> Result<BTreeSet<usize>> {
        for &index in indices {
            self.check_index(index)?;
        }
        Ok(indices.iter().copied().collect())
    }
}

impl<'a> IntoIterator for &'a LumpTable {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn table_of(names: &[&str]) -> LumpTable {
        let mut table = LumpTable::new();
        table.load_entries(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| DirectoryEntry::new(LumpName::new(name), 12 + i as i32, 1)),
        );
        table
    }

    fn names(table: &LumpTable) -> Vec<String> {
        table.iter().map(|item| item.name().to_string()).collect()
    }

    fn stage_file(dir: &TempDir, file_name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(file_name);
        let mut file = File::create(&path).unwrap();
        file.write_all(data).unwrap();
        path
    }

    #[test]
    fn test_load_entries_are_archive_backed() {
        let table = table_of(&["A", "B"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(1).unwrap().source,
            LumpSource::ArchiveBacked { offset: 13 }
        );
        assert!(!table.get(0).unwrap().is_external());
        assert_eq!(table.get(0).unwrap().source_label(), "archive");
    }

    #[test]
    fn test_add_external() {
        let dir = tempfile::tempdir().unwrap();
        let path = stage_file(&dir, "my level.wad", b"0123456789");

        let mut table = table_of(&["A"]);
        let index = table.add_external(&path).unwrap();

        assert_eq!(index, 1);
        let item = table.get(1).unwrap();
        assert_eq!(item.name(), "MYLEVELW");
        assert_eq!(item.size(), 10);
        assert_eq!(item.entry.offset, 0);
        assert_eq!(item.source_label(), path.display().to_string());
        assert_eq!(item.source, LumpSource::ExternalFile { path });
    }

    #[test]
    fn test_add_missing_file_leaves_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = table_of(&["A"]);

        let result = table.add_external(dir.path().join("missing.lmp"));
        assert!(matches!(result, Err(WadError::SourceOpen { .. })));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_add_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = LumpTable::new();
        assert!(matches!(
            table.add_external(dir.path()),
            Err(WadError::SourceOpen { .. })
        ));
    }

    #[test]
    fn test_insert_external_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = stage_file(&dir, "new.lmp", b"x");

        let mut table = table_of(&["A", "B"]);
        table.insert_external(1, &path).unwrap();
        assert_eq!(names(&table), ["A", "NEWLMP", "B"]);

        assert!(matches!(
            table.insert_external(9, &path),
            Err(WadError::IndexOutOfRange { index: 9, len: 3 })
        ));
    }

    #[test]
    fn test_delete_bulk() {
        let mut table = table_of(&["A", "B", "C", "D", "E"]);
        let removed = table.delete(&[3, 0, 1]).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(names(&table), ["C", "E"]);
    }

    #[test]
    fn test_delete_ignores_duplicates() {
        let mut table = table_of(&["A", "B", "C"]);
        assert_eq!(table.delete(&[1, 1]).unwrap(), 1);
        assert_eq!(names(&table), ["A", "C"]);
    }

    #[test]
    fn test_delete_out_of_range_is_atomic() {
        let mut table = table_of(&["A", "B"]);
        let result = table.delete(&[0, 5]);
        assert!(matches!(result, Err(WadError::IndexOutOfRange { index: 5, len: 2 })));
        assert_eq!(names(&table), ["A", "B"]);
    }

    #[test]
    fn test_move_boundaries() {
        let mut table = table_of(&["A", "B", "C"]);
        assert_eq!(table.move_item(0, Direction::Up).unwrap(), 0);
        assert_eq!(table.move_item(2, Direction::Down).unwrap(), 2);
        assert_eq!(names(&table), ["A", "B", "C"]);
    }

    #[test]
    fn test_move_up_then_down() {
        let mut table = table_of(&["A", "B", "C"]);
        let moved = table.move_item(1, Direction::Up).unwrap();
        assert_eq!(names(&table), ["B", "A", "C"]);
        table.move_item(moved, Direction::Down).unwrap();
        assert_eq!(names(&table), ["A", "B", "C"]);
    }

    #[test]
    fn test_move_selection_adjacent_run() {
        let mut table = table_of(&["A", "B", "C", "D", "E"]);

        let selection = table.move_selection(&[2, 3], Direction::Up).unwrap();
        assert_eq!(selection, [1, 2]);
        assert_eq!(names(&table), ["A", "C", "D", "B", "E"]);

        let selection = table.move_selection(&selection, Direction::Down).unwrap();
        assert_eq!(selection, [2, 3]);
        assert_eq!(names(&table), ["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_move_selection_pinned_at_boundary() {
        let mut table = table_of(&["A", "B", "C", "D"]);

        let selection = table.move_selection(&[0, 2], Direction::Up).unwrap();
        assert_eq!(selection, [0, 2]);
        assert_eq!(names(&table), ["A", "B", "C", "D"]);

        let selection = table.move_selection(&[1, 3], Direction::Down).unwrap();
        assert_eq!(selection, [1, 3]);
        assert_eq!(names(&table), ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_rename_sanitizes() {
        let mut table = table_of(&["A"]);
        let name = table.rename(0, "titlepic.png").unwrap();
        assert_eq!(name, "TITLEPIC");
        assert_eq!(table.get(0).unwrap().name(), "TITLEPIC");
        assert!(table.rename(1, "X").is_err());
    }

    #[test]
    fn test_find_and_clear() {
        let mut table = table_of(&["MAP01", "THINGS"]);
        assert_eq!(table.find("THINGS"), Some(1));
        assert_eq!(table.find("LINEDEFS"), None);

        table.clear();
        assert!(table.is_empty());
    }

    proptest! {
        #[test]
        fn prop_delete_keeps_survivor_order(
            len in 1usize..20,
            picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let labels: Vec<String> = (0..len).map(|i| format!("L{}", i)).collect();
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut table = table_of(&refs);

            let doomed: BTreeSet<usize> = picks.iter().map(|p| p.index(len)).collect();
            let indices: Vec<usize> = picks.iter().map(|p| p.index(len)).collect();
            let removed = table.delete(&indices).unwrap();

            prop_assert_eq!(removed, doomed.len());
            let expected: Vec<String> = labels
                .iter()
                .enumerate()
                .filter(|(i, _)| !doomed.contains(i))
                .map(|(_, l)| l.clone())
                .collect();
            prop_assert_eq!(names(&table), expected);
        }

        #[test]
        fn prop_move_up_down_restores(len in 2usize..20, pick in any::<prop::sample::Index>()) {
            let labels: Vec<String> = (0..len).map(|i| format!("L{}", i)).collect();
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut table = table_of(&refs);

            // Any index but the first, so the move up is real
            let index = 1 + pick.index(len - 1);
            let moved = table.move_item(index, Direction::Up).unwrap();
            table.move_item(moved, Direction::Down).unwrap();
            prop_assert_eq!(names(&table), labels);
        }
    }
}
