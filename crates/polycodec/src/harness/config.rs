//! Harness configuration (TOML).

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::CodecId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("bad config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which codecs to run and how large the generated containers are.
///
/// ```toml
/// codecs = ["cbor", "msgpack", "tiny", "json"]
/// map_size = 100
/// sequence_size = 10
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub codecs: Vec<CodecId>,
    /// Entries in the standalone `Int64FloatMap`.
    pub map_size: usize,
    /// Maps in the `MapSequence`, and entries in each of them.
    pub sequence_size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            codecs: CodecId::ALL.to_vec(),
            map_size: 100,
            sequence_size: 10,
        }
    }
}

impl HarnessConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
