//! FetchStep: suspende el run mientras una "fuente externa" responde.
//!
//! El trabajo lento corre en un thread aparte, lanzado por el código
//! diferido, que por contrato corre recién cuando el constructor retornó y
//! la suspensión está comprometida. El thread reanuda aportando un
//! `FetchedRecord` como contexto extra.

use std::thread;
use std::time::Duration;

use relay_core::model::ctx_value;
use relay_core::step::{StepCx, StepDef};
use relay_core::{Outcome, StepError};

use crate::context::{FetchedRecord, RequestInfo};
use crate::Response;

pub struct FetchStep {
    record_id: String,
    /// Latencia simulada de la fuente. Cero en tests.
    latency: Duration,
}

impl FetchStep {
    pub fn new(record_id: impl Into<String>) -> Self {
        Self { record_id: record_id.into(), latency: Duration::ZERO }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl StepDef<Response> for FetchStep {
    fn id(&self) -> &str {
        "fetch"
    }

    fn construct(&self, cx: &mut StepCx<'_, Response>) -> Result<Outcome, StepError> {
        let record_id = self.record_id.clone();
        let latency = self.latency;
        let path = cx.get::<RequestInfo>().map(|r| r.path.clone()).unwrap_or_default();

        cx.defer_with(move |resumer| {
            thread::spawn(move || {
                if !latency.is_zero() {
                    thread::sleep(latency);
                }
                let record = FetchedRecord {
                    id: record_id.clone(),
                    payload: serde_json::json!({ "id": record_id, "path": path }),
                };
                // reanudación one-shot; un segundo intento daría NotSuspended
                let _ = resumer.resume(vec![ctx_value(record)]);
            });
        })?;

        Ok(Outcome::Continuing(Vec::new()))
    }
}
