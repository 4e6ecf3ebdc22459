//! Anonymized usage telemetry
//!
//! Operations are wrapped in a named [`TelemetryEvent`]; the wrapper records
//! outcome and duration and hands the event to a [`TelemetrySink`] when the
//! user has opted in. Telemetry never changes the wrapped operation's result.

mod settings;
mod sink;

pub use settings::{TelemetrySettings, UserType};
pub use sink::{MemorySink, NullSink, TelemetryPayload, TelemetrySink, TracingSink};

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Value, json};
use sha2::{Digest, Sha256};

const PII_HASH_KEY: &str = "4c1e0a52-8d2f-4e55-9a7d-0f3b6f1d9e21";

/// Keyed SHA-256 digest used for personally identifying values.
pub fn hash_pii(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(PII_HASH_KEY.as_bytes());
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A single telemetry data point.
#[derive(Debug, Clone)]
pub struct TelemetryEvent {
    name: String,
    properties: BTreeMap<String, Value>,
    pii: BTreeMap<String, String>,
}

impl TelemetryEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            pii: BTreeMap::new(),
        }
    }

    /// Builder form of [`TelemetryEvent::add`].
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.add(key, value);
        self
    }

    pub fn add(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// Attach a value that is only ever sent hashed.
    pub fn add_pii(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pii.insert(key.into(), value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }
}

/// Entry point for recording telemetry.
#[derive(Clone)]
pub struct Telemetry {
    sink: Arc<dyn TelemetrySink>,
    settings: Arc<TelemetrySettings>,
    enabled: bool,
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("enabled", &self.enabled)
            .field("opt_in", &self.settings.opt_in())
            .finish()
    }
}

impl Telemetry {
    pub fn new(sink: Arc<dyn TelemetrySink>, settings: TelemetrySettings) -> Self {
        Self {
            sink,
            settings: Arc::new(settings),
            enabled: true,
        }
    }

    /// Telemetry that records nothing.
    pub fn disabled() -> Self {
        Self {
            sink: Arc::new(NullSink),
            settings: Arc::new(TelemetrySettings::default()),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.settings.opt_in()
    }

    /// Run `body` as a named operation and report it.
    ///
    /// The event gains `succeeded` and `durationMs`; a failure's message
    /// is attached as a hashed `error` property. The body's result is
    /// returned unchanged.
    pub async fn record_operation<T, E, F>(&self, mut event: TelemetryEvent, body: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        let result = body.await;

        event.add("succeeded", json!(result.is_ok()));
        event.add("durationMs", json!(started.elapsed().as_millis() as u64));
        if let Err(e) = &result {
            event.add_pii("error", e.to_string());
        }

        self.send(event).await;
        result
    }

    /// Deliver an event if telemetry is enabled and the user opted in.
    pub async fn send(&self, event: TelemetryEvent) {
        if !self.is_enabled() {
            tracing::trace!(event = event.name(), "Telemetry disabled, dropping event");
            return;
        }

        let payload = self.payload(event);
        if let Err(e) = self.sink.send(&payload).await {
            tracing::debug!(event = %payload.name, error = %e, "Failed to deliver telemetry");
        }
    }

    fn payload(&self, mut event: TelemetryEvent) -> TelemetryPayload {
        if let Some(user_id) = self.settings.user_id() {
            event.add("luna.userId", json!(user_id));
        }
        event.add("luna.userType", json!(self.settings.user_type().as_str()));

        let internal = self.settings.is_internal();
        for (key, raw) in std::mem::take(&mut event.pii) {
            if internal {
                event.add(format!("{key}.nothashed"), json!(raw));
            }
            event.add(key, json!(hash_pii(&raw)));
        }

        TelemetryPayload::from_event(&event)
    }
}
