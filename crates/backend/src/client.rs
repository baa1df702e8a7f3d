//! Blocking REST client for the simulation backend.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::BackendError;
use crate::audit_log::{AuditEntry, AuditQuery};
use crate::neo::{CuratedNeoList, NeoSummary};

/// Reply to `POST /simulation/decision`.
#[derive(Debug, Deserialize, Default)]
pub struct DecisionReply {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub simulation_state: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AuditLogReply {
    #[serde(default)]
    audit_log: Vec<AuditEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    detail: Option<serde_json::Value>,
}

/// Thin wrapper around a `reqwest` blocking client with a fixed base URL and timeout.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Record the probe decision on the audit ledger.
    pub fn submit_decision(&self, launch_probe: bool) -> Result<DecisionReply, BackendError> {
        let response = self
            .client
            .post(self.url("/simulation/decision"))
            .json(&serde_json::json!({ "launch_probe": launch_probe }))
            .send()?;
        read_json(response)
    }

    /// Fetch the audit trail, optionally filtered server-side by date and phase.
    pub fn fetch_audit_log(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, BackendError> {
        let response = self
            .client
            .get(self.url("/api/audit"))
            .query(&query.query_pairs())
            .send()?;
        let reply: AuditLogReply = read_json(response)?;
        Ok(reply.audit_log)
    }

    pub fn fetch_curated_neos(&self) -> Result<CuratedNeoList, BackendError> {
        let response = self.client.get(self.url("/neos/curated_list")).send()?;
        read_json(response)
    }

    pub fn fetch_neo_list(&self) -> Result<Vec<NeoSummary>, BackendError> {
        let response = self.client.get(self.url("/neos/list")).send()?;
        read_json(response)
    }

    /// Curated list, or an empty one when the backend is unreachable.
    pub fn curated_neos_or_default(&self) -> CuratedNeoList {
        self.fetch_curated_neos().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not load curated NEO list");
            CuratedNeoList::default()
        })
    }

    /// Full NEO list, or an empty one when the backend is unreachable.
    pub fn neo_list_or_default(&self) -> Vec<NeoSummary> {
        self.fetch_neo_list().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not load NEO list");
            Vec::new()
        })
    }
}

fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            detail: error_detail(&body),
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Extract the `detail` field of an error body; FastAPI validation errors carry a list.
pub fn error_detail(body: &str) -> Option<String> {
    let reply: ErrorReply = serde_json::from_str(body).ok()?;
    match reply.detail? {
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
