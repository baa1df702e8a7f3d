//! Client for the simulation backend: decision audit submission, the public audit
//! trail, and the near-Earth object catalogs used by the selection aid.

pub mod audit;
pub mod audit_log;
pub mod client;
pub mod neo;

pub use audit::{
    AuditOutcome, AuditStatus, DecisionAuditClient, DecisionRecord, HttpAuditClient,
    LocalAuditLedger,
};
pub use audit_log::{AuditData, AuditEntry, AuditQuery, filter_entries};
pub use client::BackendClient;
pub use neo::{CuratedNeoList, NeoClassification, NeoRef, NeoSummary, classify_neo};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("backend returned status {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid consensus timestamp '{0}'")]
    InvalidTimestamp(String),
}
