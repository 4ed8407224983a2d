pub mod builder;
pub mod copy;
mod format;
pub mod name;
mod reader;

pub use builder::{same_file, ArchiveBuilder};
pub use copy::DEFAULT_BUFFER_SIZE;
pub use format::{
    DirectoryEntry, WadHeader, WadType, DENTRY_SIZE, HEADER_SIZE, IWAD_MAGIC, MAX_NAME_LENGTH,
    PWAD_MAGIC,
};
pub use name::{sanitize, LumpName};
pub use reader::{Entries, WadReader};
