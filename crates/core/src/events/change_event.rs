//! Change event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of mutation a change event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// The kind of entity a change event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Portfolio,
    Technology,
}

/// Event describing a completed mutation.
///
/// Created at the moment a mutation commits and handed to the dispatcher.
/// The snapshot payload is the entity state after the mutation (or the last
/// state before a deletion).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub change_kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
}

impl ChangeEvent {
    /// Creates an event for the given entity with a serialized snapshot.
    pub fn new(
        entity_id: impl Into<String>,
        entity_type: EntityType,
        change_kind: ChangeKind,
        payload: Value,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_type,
            change_kind,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Creates a portfolio change event, serializing the snapshot.
    pub fn portfolio<T: Serialize>(id: &str, kind: ChangeKind, snapshot: &T) -> Self {
        Self::new(
            id,
            EntityType::Portfolio,
            kind,
            serde_json::to_value(snapshot).unwrap_or(Value::Null),
        )
    }

    /// Creates a technology change event, serializing the snapshot.
    pub fn technology<T: Serialize>(id: &str, kind: ChangeKind, snapshot: &T) -> Self {
        Self::new(
            id,
            EntityType::Technology,
            kind,
            serde_json::to_value(snapshot).unwrap_or(Value::Null),
        )
    }

    /// The wire envelope expected by the audit sink:
    /// `{type, entityId, timestamp, payload}`.
    pub fn to_envelope(&self) -> Value {
        serde_json::json!({
            "type": format!(
                "{}_{}",
                serde_json::to_value(self.entity_type)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_owned))
                    .unwrap_or_default(),
                serde_json::to_value(self.change_kind)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_owned))
                    .unwrap_or_default(),
            ),
            "entityId": self.entity_id,
            "timestamp": self.timestamp.to_rfc3339(),
            "payload": self.payload,
        })
    }
}
