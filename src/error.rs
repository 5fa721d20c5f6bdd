use thiserror::Error;

use crate::data::DatasetStatus;

/// Errors surfaced by the engine before any chart is derived.
///
/// Nothing inside a view rendering pass fails: missing sources, unmatched
/// joins and malformed numbers all degrade to empty or zeroed charts. These
/// variants cover the payload-level gates and the textual inputs around them.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("dataset not ready (status: {0})")]
    NotReady(DatasetStatus),

    #[error("dataset processing failed")]
    Failed,

    #[error("unknown view '{0}' (expected brand, packtype, ppg, cross or correlation)")]
    UnknownView(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("invalid analytics payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
