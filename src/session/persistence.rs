//! Versioned save snapshots
//!
//! A snapshot is `{version, timestamp, state}` where `state` maps each
//! session field name to its JSON value. Loading overlays the saved keys on a
//! fresh session, so keys missing from an older save keep their defaults and
//! unknown keys are ignored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::session::state::SessionState;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    pub timestamp: DateTime<Utc>,
    pub state: BTreeMap<String, Value>,
}

/// Serialize one value for the snapshot
pub fn encode<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Deserialize one snapshot value back into its type
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

fn fields(state: &SessionState) -> Result<BTreeMap<String, Value>> {
    match encode(state)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(SimError::InvalidConfig(format!(
            "session did not serialize to an object: {}",
            other
        ))),
    }
}

pub fn snapshot(state: &SessionState) -> Result<SaveSnapshot> {
    Ok(SaveSnapshot {
        version: SAVE_VERSION,
        timestamp: Utc::now(),
        state: fields(state)?,
    })
}

/// Rebuild a session from a snapshot
pub fn restore(snapshot: SaveSnapshot, config: &SimulationConfig) -> Result<SessionState> {
    if snapshot.version != SAVE_VERSION {
        return Err(SimError::SaveVersion {
            found: snapshot.version,
            expected: SAVE_VERSION,
        });
    }

    let mut merged = fields(&SessionState::new(config))?;
    for (key, value) in snapshot.state {
        if merged.contains_key(&key) {
            merged.insert(key, value);
        } else {
            tracing::debug!("Ignoring unknown save key {}", key);
        }
    }
    decode(Value::Object(merged.into_iter().collect()))
}

pub fn save_to_path(state: &SessionState, path: &Path) -> Result<()> {
    let snap = snapshot(state)?;
    std::fs::write(path, serde_json::to_string_pretty(&snap)?)?;
    tracing::info!("Saved session {} to {}", state.session_id(), path.display());
    Ok(())
}

pub fn load_from_path(path: &Path, config: &SimulationConfig) -> Result<SessionState> {
    let content = std::fs::read_to_string(path)?;
    let snap: SaveSnapshot = serde_json::from_str(&content)?;
    let state = restore(snap, config)?;
    tracing::info!("Loaded session {} from {}", state.session_id(), path.display());
    Ok(state)
}
