//! Editor configuration
//!
//! Settings are plain TOML; every key is optional:
//!
//! ```toml
//! type_tag = "preserve"     # or "iwad" / "pwad"
//! copy_buffer_size = 8192
//! allow_overwrite = true
//! ```

use crate::archive::copy::DEFAULT_BUFFER_SIZE;
use crate::archive::WadType;
use crate::error::{Result, WadError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which type tag a rebuilt archive carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeTagPolicy {
    /// Keep the loaded archive's tag; new archives and unrecognized tags get `IWAD`
    #[default]
    Preserve,
    Iwad,
    Pwad,
}

impl TypeTagPolicy {
    /// Tag to write, given the tag of the archive the table came from
    pub fn resolve(self, original: Option<WadType>) -> WadType {
        match self {
            Self::Iwad => WadType::Iwad,
            Self::Pwad => WadType::Pwad,
            Self::Preserve => match original {
                Some(tag) if tag.is_recognized() => tag,
                _ => WadType::Iwad,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub type_tag: TypeTagPolicy,

    /// Size of the intermediate buffer used when copying lump bytes
    pub copy_buffer_size: usize,

    /// Whether a save may replace an existing file (never the loaded archive)
    pub allow_overwrite: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            type_tag: TypeTagPolicy::Preserve,
            copy_buffer_size: DEFAULT_BUFFER_SIZE,
            allow_overwrite: true,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.copy_buffer_size == 0 {
            return Err(WadError::InvalidConfig(
                "copy_buffer_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
