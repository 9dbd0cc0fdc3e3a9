//! AnnotateStep: deja una `Annotation` en la bolsa y sigue.
//!
//! No produce resultado parcial; su único efecto es la contribución de
//! contexto para los steps aguas abajo.

use relay_core::model::ctx_value;
use relay_core::step::{StepCx, StepDef};
use relay_core::{Outcome, StepError};

use crate::context::Annotation;

pub struct AnnotateStep {
    id: String,
    label: String,
}

impl AnnotateStep {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

impl StepDef<crate::Response> for AnnotateStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "annotate"
    }

    fn construct(&self, _cx: &mut StepCx<'_, crate::Response>) -> Result<Outcome, StepError> {
        Ok(Outcome::Continuing(vec![ctx_value(Annotation::new(self.label.clone()))]))
    }
}
