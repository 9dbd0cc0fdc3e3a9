//! ExpandStep: reescritura dinámica de la cadena en el cursor.
//!
//! Inserta una anotación extra por cada etiqueta pedida; las inserciones
//! corren inmediatamente después de este step, antes de lo que ya estaba
//! encolado, y en el orden en que se pidieron.

use std::sync::Arc;

use relay_core::step::{StepCx, StepDef};
use relay_core::{Outcome, StepError};

use crate::steps::AnnotateStep;
use crate::Response;

pub struct ExpandStep {
    labels: Vec<String>,
}

impl ExpandStep {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl StepDef<Response> for ExpandStep {
    fn id(&self) -> &str {
        "expand"
    }

    fn construct(&self, cx: &mut StepCx<'_, Response>) -> Result<Outcome, StepError> {
        for (i, label) in self.labels.iter().enumerate() {
            let id = format!("expand.{i}");
            cx.insert_step(Arc::new(AnnotateStep::new(id, label.clone())));
        }
        Ok(Outcome::Continuing(Vec::new()))
    }
}
