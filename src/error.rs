//! Failure taxonomy for the pipeline stages.
//!
//! Per-item errors (`Decode`, `Conversion`, `Persist`) are recorded and the stage keeps going.
//! `DirectoryOpen` and `Allocation` end the stage that hit them; downstream stages
//! still drain and terminate because the channel closes when the stage returns.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageError {
    #[error("cannot open source directory {}: {reason}", path.display())]
    DirectoryOpen { path: PathBuf, reason: String },

    #[error("cannot load image {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("cannot write grayscale image {}: {reason}", path.display())]
    Persist { path: PathBuf, reason: String },

    #[error("cannot allocate grayscale buffer for {width}x{height} image")]
    Allocation { width: u32, height: u32 },

    #[error("cannot convert {width}x{height} image: {reason}")]
    Conversion {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("{stage} thread panicked")]
    StagePanicked { stage: &'static str },
}

impl StageError {
    /// True for errors that stopped a stage rather than a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StageError::DirectoryOpen { .. }
                | StageError::Allocation { .. }
                | StageError::StagePanicked { .. }
        )
    }
}
