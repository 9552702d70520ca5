use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::model::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never got an answer.
    Unavailable(String),
    /// The backend answered and refused.
    Rejected(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Unavailable(e) => write!(f, "backend unavailable: {e}"),
            BackendError::Rejected(e) => write!(f, "backend rejected request: {e}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The scheduling backend. Each call is one request/response round-trip.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Check the service and return its protocol version.
    async fn check_service(&self) -> Result<u32, BackendError>;

    /// Every rule, templates included.
    async fn record_schedule_list(&self) -> Result<Vec<RecordingRule>, BackendError>;

    async fn upcoming_list(&self) -> Result<Vec<ScheduledInstance>, BackendError>;

    async fn rec_group_list(&self) -> Result<Vec<String>, BackendError>;

    async fn setting(&self, name: &str) -> Result<Option<String>, BackendError>;

    /// Create a rule and return the id the backend assigned.
    async fn add_record_schedule(&self, rule: &RecordingRule) -> Result<u32, BackendError>;

    async fn update_record_schedule(&self, rule: &RecordingRule) -> Result<(), BackendError>;

    async fn remove_record_schedule(&self, record_id: u32) -> Result<(), BackendError>;

    async fn stop_recording(&self, instance: &ScheduledInstance) -> Result<(), BackendError>;
}

// ── Snapshot backend ─────────────────────────────────────

/// Serialized backend state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub protocol_version: u32,
    pub rules: Vec<RecordingRule>,
    pub upcoming: Vec<ScheduledInstance>,
    pub recording_groups: Vec<String>,
    pub settings: HashMap<String, String>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Snapshot, BackendError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| BackendError::Unavailable(format!("{}: {e}", path.display())))
    }
}

/// In-memory backend over a [`Snapshot`]. Writes change the rule list;
/// the upcoming list only changes through `stop_recording`.
pub struct SnapshotBackend {
    state: Mutex<Snapshot>,
}

impl SnapshotBackend {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { state: Mutex::new(snapshot) }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl Backend for SnapshotBackend {
    async fn check_service(&self) -> Result<u32, BackendError> {
        Ok(self.state.lock().await.protocol_version)
    }

    async fn record_schedule_list(&self) -> Result<Vec<RecordingRule>, BackendError> {
        Ok(self.state.lock().await.rules.clone())
    }

    async fn upcoming_list(&self) -> Result<Vec<ScheduledInstance>, BackendError> {
        Ok(self.state.lock().await.upcoming.clone())
    }

    async fn rec_group_list(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.state.lock().await.recording_groups.clone())
    }

    async fn setting(&self, name: &str) -> Result<Option<String>, BackendError> {
        Ok(self.state.lock().await.settings.get(name).cloned())
    }

    async fn add_record_schedule(&self, rule: &RecordingRule) -> Result<u32, BackendError> {
        if matches!(rule.rule_type, RuleType::NotRecording | RuleType::Unknown) {
            return Err(BackendError::Rejected(format!("cannot add rule of type {:?}", rule.rule_type)));
        }
        let mut state = self.state.lock().await;
        let id = state.rules.iter().map(|r| r.record_id).max().unwrap_or(0) + 1;
        let mut stored = rule.clone();
        stored.record_id = id;
        state.rules.push(stored);
        Ok(id)
    }

    async fn update_record_schedule(&self, rule: &RecordingRule) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        match state.rules.iter_mut().find(|r| r.record_id == rule.record_id) {
            Some(stored) => {
                *stored = rule.clone();
                Ok(())
            }
            None => Err(BackendError::Rejected(format!("no rule {}", rule.record_id))),
        }
    }

    async fn remove_record_schedule(&self, record_id: u32) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        let before = state.rules.len();
        state.rules.retain(|r| r.record_id != record_id);
        if state.rules.len() == before {
            return Err(BackendError::Rejected(format!("no rule {record_id}")));
        }
        Ok(())
    }

    async fn stop_recording(&self, instance: &ScheduledInstance) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        match state.upcoming.iter_mut().find(|p| p.uid == instance.uid) {
            Some(p) => {
                p.status = RecordingStatus::Recorded;
                Ok(())
            }
            None => Err(BackendError::Rejected(format!("no instance {}", instance.uid))),
        }
    }
}
