//! RenderStep: materializa la respuesta final a partir de la bolsa.
//!
//! Recolecta todas las anotaciones en orden de contribución, vuelca el
//! registro traído por un fetch previo si existe, fija el status y declara
//! fin. El predicado de fin exige un status presente: un render que por
//! alguna razón no fijó código no cierra el run.

use relay_core::step::{StepCx, StepDef};
use relay_core::{Outcome, StepError};

use crate::context::{Annotation, FetchedRecord, RequestInfo};
use crate::Response;

pub struct RenderStep {
    status: u16,
}

impl RenderStep {
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

impl Default for RenderStep {
    fn default() -> Self {
        Self::new(200)
    }
}

impl StepDef<Response> for RenderStep {
    fn id(&self) -> &str {
        "render"
    }

    fn construct(&self, cx: &mut StepCx<'_, Response>) -> Result<Outcome, StepError> {
        let labels: Vec<String> = cx
            .bag()
            .get_all::<Annotation>()
            .into_iter()
            .map(|a| a.label.clone())
            .collect();
        let record = cx.get::<FetchedRecord>();
        let path = cx.get::<RequestInfo>().map(|r| r.path.clone());

        let response = cx.response();
        if let Some(path) = path {
            response.set_field("path", serde_json::Value::String(path));
        }
        response.set_field("annotations", serde_json::json!(labels));
        if let Some(record) = record {
            response.set_field("record", record.payload.clone());
        }
        response.set_status(self.status);

        Ok(Outcome::Finished)
    }

    fn is_finished(&self, result: Option<&Response>) -> bool {
        result.map(Response::is_settled).unwrap_or(false)
    }

    fn is_modified(&self, result: &Response) -> bool {
        result.modified
    }
}
