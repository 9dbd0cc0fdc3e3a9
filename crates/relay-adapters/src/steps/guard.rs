//! GuardStep: corta el run si no hay un `Principal` con el rol requerido.

use relay_core::step::{StepCx, StepDef};
use relay_core::{Outcome, StepError};

use crate::context::Principal;
use crate::Response;

pub struct GuardStep {
    required_role: String,
}

impl GuardStep {
    pub fn new(required_role: impl Into<String>) -> Self {
        Self { required_role: required_role.into() }
    }
}

impl StepDef<Response> for GuardStep {
    fn id(&self) -> &str {
        "guard"
    }

    fn construct(&self, cx: &mut StepCx<'_, Response>) -> Result<Outcome, StepError> {
        let allowed = cx
            .get::<Principal>()
            .map(|p| p.has_role(&self.required_role))
            .unwrap_or(false);
        if !allowed {
            // rechazo: el run termina acá, sin respuesta
            return Ok(Outcome::Rejected);
        }
        Ok(Outcome::Continuing(Vec::new()))
    }
}
