//! Non-blocking submission of irreversible mission decisions to the audit ledger.
//!
//! `submit` returns immediately. The outcome arrives later on the receiver handed out
//! at construction, and the caller applies it as an independent event.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::BackendError;
use crate::client::BackendClient;

/// A decision committed locally and queued for auditing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRecord {
    pub request_id: u64,
    pub launch_probe: bool,
    /// Simulated instant at which the decision was taken.
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuditStatus {
    Accepted { detail: Option<String> },
    Rejected { reason: String },
}

/// Resolution of one submission, delivered after the fact.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    pub request_id: u64,
    pub launch_probe: bool,
    pub status: AuditStatus,
}

impl AuditOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, AuditStatus::Accepted { .. })
    }
}

/// Seam between the mission core and whatever ledger records its decisions.
pub trait DecisionAuditClient {
    /// Queue `record` for submission without waiting for the result.
    fn submit(&self, record: DecisionRecord);
}

/// Submits decisions to `POST /simulation/decision` from a background thread.
#[derive(Debug, Clone)]
pub struct HttpAuditClient {
    client: Arc<BackendClient>,
    outcomes: Sender<AuditOutcome>,
}

impl HttpAuditClient {
    pub fn new(client: Arc<BackendClient>) -> (Self, Receiver<AuditOutcome>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                client,
                outcomes: tx,
            },
            rx,
        )
    }
}

impl DecisionAuditClient for HttpAuditClient {
    fn submit(&self, record: DecisionRecord) {
        let client = Arc::clone(&self.client);
        let outcomes = self.outcomes.clone();
        thread::spawn(move || {
            let status = match client.submit_decision(record.launch_probe) {
                Ok(reply) => AuditStatus::Accepted {
                    detail: reply.detail,
                },
                Err(err) => {
                    tracing::warn!(request_id = record.request_id, error = %err, "decision audit failed");
                    AuditStatus::Rejected {
                        reason: rejection_reason(&err),
                    }
                }
            };
            // The receiver may be gone if the session ended first.
            let _ = outcomes.send(AuditOutcome {
                request_id: record.request_id,
                launch_probe: record.launch_probe,
                status,
            });
        });
    }
}

fn rejection_reason(err: &BackendError) -> String {
    match err {
        BackendError::Status {
            detail: Some(detail),
            ..
        } => detail.clone(),
        other => other.to_string(),
    }
}

/// In-process ledger used when auditing is disabled: every submission is recorded
/// and accepted immediately.
#[derive(Debug, Clone)]
pub struct LocalAuditLedger {
    records: Arc<Mutex<Vec<DecisionRecord>>>,
    outcomes: Sender<AuditOutcome>,
}

impl LocalAuditLedger {
    pub fn new() -> (Self, Receiver<AuditOutcome>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                records: Arc::new(Mutex::new(Vec::new())),
                outcomes: tx,
            },
            rx,
        )
    }

    /// Snapshot of every record submitted so far.
    pub fn records(&self) -> Vec<DecisionRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl DecisionAuditClient for LocalAuditLedger {
    fn submit(&self, record: DecisionRecord) {
        let outcome = AuditOutcome {
            request_id: record.request_id,
            launch_probe: record.launch_probe,
            status: AuditStatus::Accepted {
                detail: Some("recorded locally".to_string()),
            },
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        let _ = self.outcomes.send(outcome);
    }
}
