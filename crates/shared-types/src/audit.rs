//! Tamper-evident audit trail for billboard, report and compliance events
//!
//! Events are linked by SHA-256 hash, and each event also carries its own
//! hash, so editing any entry (the newest included) or dropping an earlier
//! one breaks verification. Persisting the trail is left to the caller.

use crate::types::ComplianceResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// Types of auditable events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    Create,
    Read,
    Update,
    Delete,
    Export,
    Import,
    AccessDenied,
    Error,
    ComplianceCheck { violations_found: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failure,
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit chain broken at event {index}")]
    ChainBroken { index: usize },

    #[error("audit event {index} does not match its recorded hash")]
    HashMismatch { index: usize },

    #[error("audit trail serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub user_id: Option<i64>,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AuditStatus,
    pub previous_hash: Option<String>,
    /// Hash of this event, fixed when it is appended to a trail
    #[serde(default)]
    pub event_hash: String,
}

impl AuditEvent {
    pub fn new(action: AuditAction, resource_type: &str) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            action,
            resource_type: resource_type.to_string(),
            resource_id: None,
            user_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
            ip_address: None,
            user_agent: None,
            status: AuditStatus::Success,
            previous_hash: None,
            event_hash: String::new(),
        }
    }

    pub fn resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }

    pub fn failed(mut self) -> Self {
        self.status = AuditStatus::Failure;
        self
    }

    /// Compute the hash of this event (for chain linking)
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.event_id.as_bytes());
        hasher.update(self.timestamp.to_rfc3339().as_bytes());
        hasher.update(format!("{:?}", self.action).as_bytes());
        hasher.update(self.resource_type.as_bytes());
        if let Some(ref id) = self.resource_id {
            hasher.update(id.as_bytes());
        }
        if let Some(user_id) = self.user_id {
            hasher.update(user_id.to_le_bytes());
        }
        hasher.update(self.details.to_string().as_bytes());
        hasher.update(format!("{:?}", self.status).as_bytes());
        if let Some(ref prev) = self.previous_hash {
            hasher.update(prev.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Chain of audit events with hash linking
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AuditTrail {
    pub events: Vec<AuditEvent>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the hash of the last event (for linking)
    pub fn last_hash(&self) -> Option<String> {
        self.events.last().map(|e| e.event_hash.clone())
    }

    /// Append an event, linking it to the previous one and sealing its hash
    pub fn append(&mut self, mut event: AuditEvent) -> &AuditEvent {
        event.previous_hash = self.last_hash();
        event.event_hash = event.compute_hash();
        let index = self.events.len();
        self.events.push(event);
        &self.events[index]
    }

    /// Record the outcome of a compliance evaluation
    pub fn record_compliance_check(
        &mut self,
        result: &ComplianceResult,
        user_id: Option<i64>,
    ) -> &AuditEvent {
        let rule_ids: Vec<&str> = result.violations.iter().map(|v| v.rule_id.as_str()).collect();
        let mut event = AuditEvent::new(
            AuditAction::ComplianceCheck {
                violations_found: u32::try_from(result.violations.len()).unwrap_or(u32::MAX),
            },
            "billboard",
        )
        .resource(result.billboard_id.clone())
        .details(serde_json::json!({
            "is_compliant": result.is_compliant,
            "rule_ids": rule_ids,
            "skipped_categories": result.skipped_categories,
            "checked_at": result.checked_at,
        }));
        if let Some(user_id) = user_id {
            event = event.user(user_id);
        }
        self.append(event)
    }

    /// Verify the integrity of the chain
    pub fn verify(&self) -> Result<(), AuditError> {
        let mut expected_prev: Option<String> = None;

        for (index, event) in self.events.iter().enumerate() {
            if event.previous_hash != expected_prev {
                return Err(AuditError::ChainBroken { index });
            }
            let hash = event.compute_hash();
            if event.event_hash != hash {
                return Err(AuditError::HashMismatch { index });
            }
            expected_prev = Some(hash);
        }

        Ok(())
    }

    /// Events at or after `cutoff`, for retention pruning by the caller
    pub fn retained_since(&self, cutoff: DateTime<Utc>) -> impl Iterator<Item = &AuditEvent> {
        self.events.iter().filter(move |e| e.timestamp >= cutoff)
    }

    pub fn to_json(&self) -> Result<String, AuditError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        Ok(serde_json::from_str(json)?)
    }
}
