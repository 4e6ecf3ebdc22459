//! Telemetry sinks

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::TelemetryEvent;
use crate::Result;

/// An event flattened into string properties and numeric measures.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryPayload {
    pub event_id: Uuid,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub properties: BTreeMap<String, String>,
    pub measures: BTreeMap<String, f64>,
}

impl TelemetryPayload {
    /// Strings become properties, numbers become measures, and anything
    /// else is sent as its JSON text.
    pub fn from_event(event: &TelemetryEvent) -> Self {
        let mut properties = BTreeMap::new();
        let mut measures = BTreeMap::new();

        for (key, value) in event.properties() {
            match value {
                Value::String(s) => {
                    properties.insert(key.clone(), s.clone());
                }
                Value::Number(n) => match n.as_f64() {
                    Some(f) => {
                        measures.insert(key.clone(), f);
                    }
                    None => {
                        properties.insert(key.clone(), n.to_string());
                    }
                },
                other => {
                    properties.insert(key.clone(), other.to_string());
                }
            }
        }

        Self {
            event_id: Uuid::new_v4(),
            name: event.name().to_string(),
            timestamp: Utc::now(),
            properties,
            measures,
        }
    }
}

/// Destination for telemetry payloads.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn send(&self, payload: &TelemetryPayload) -> Result<()>;
}

/// Emits payloads as `tracing` events on the `luna::telemetry` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl TelemetrySink for TracingSink {
    async fn send(&self, payload: &TelemetryPayload) -> Result<()> {
        let body = serde_json::to_string(payload)?;
        tracing::info!(target: "luna::telemetry", event = %payload.name, %body);
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl TelemetrySink for NullSink {
    async fn send(&self, _payload: &TelemetryPayload) -> Result<()> {
        Ok(())
    }
}

/// Keeps payloads in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TelemetryPayload>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    pub async fn events(&self) -> Vec<TelemetryPayload> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl TelemetrySink for MemorySink {
    async fn send(&self, payload: &TelemetryPayload) -> Result<()> {
        self.events.lock().await.push(payload.clone());
        Ok(())
    }
}
