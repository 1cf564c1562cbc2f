//! Error types for loading a gadgets definition

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or parsing a gadgets definition.
///
/// Filesystem failures during scaffolding are not represented here; they are
/// propagated as `anyhow::Error` with the offending path attached.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The definition file could not be read
    #[error("Failed to read gadgets definition {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The definition text is not a valid gadgets document
    #[error("Error parsing gadgets definition: {0}")]
    Parse(#[from] serde_yaml::Error),
}
