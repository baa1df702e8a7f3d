//! Entries of the public decision audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::BackendError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditData {
    pub message: String,
}

/// One consensus-ordered audit message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Epoch seconds as a decimal string, e.g. `"1731945600.123456789"`.
    pub consensus_timestamp: String,
    pub audit_data: AuditData,
}

impl AuditEntry {
    /// Consensus timestamp in milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> Result<f64, BackendError> {
        let seconds: f64 = self
            .consensus_timestamp
            .trim()
            .parse()
            .map_err(|_| BackendError::InvalidTimestamp(self.consensus_timestamp.clone()))?;
        if !seconds.is_finite() {
            return Err(BackendError::InvalidTimestamp(self.consensus_timestamp.clone()));
        }
        Ok(seconds * 1000.0)
    }

    pub fn consensus_time(&self) -> Option<DateTime<Utc>> {
        let ms = self.timestamp_ms().ok()?;
        DateTime::from_timestamp_millis(ms.floor() as i64)
    }

    pub fn message(&self) -> &str {
        &self.audit_data.message
    }
}

/// Optional audit trail filters: a UTC calendar date and a phase substring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditQuery {
    pub date: Option<NaiveDate>,
    pub phase: Option<String>,
}

impl AuditQuery {
    /// Query-string pairs in the backend's expected format (`date=YYYY-MM-DD`, `phase=<name>`).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(date) = self.date {
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(phase) = self.phase.as_ref().filter(|p| !p.is_empty()) {
            pairs.push(("phase", phase.clone()));
        }
        pairs
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(date) = self.date {
            match entry.consensus_time() {
                Some(time) if time.date_naive() == date => {}
                _ => return false,
            }
        }
        match self.phase.as_deref() {
            Some(phase) if !phase.is_empty() => entry.message().contains(phase),
            _ => true,
        }
    }
}

/// Apply `query` to an already fetched trail, mirroring the backend's filtering.
pub fn filter_entries<'a>(entries: &'a [AuditEntry], query: &AuditQuery) -> Vec<&'a AuditEntry> {
    entries.iter().filter(|entry| query.matches(entry)).collect()
}
