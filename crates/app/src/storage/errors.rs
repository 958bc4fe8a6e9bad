//! Storage errors.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error")]
    Io(#[from] io::Error),

    #[error("failed to encode ledger value")]
    Encode(#[source] serde_json::Error),

    #[error("storage file {path} is not a valid key-value document")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
