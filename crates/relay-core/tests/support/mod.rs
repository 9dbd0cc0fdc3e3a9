//! Utilería compartida por los tests de integración del core.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use relay_core::step::{StepCx, StepDef};
use relay_core::{Callback, Outcome, RunError, State, StepError};

/// Resultado parcial de juguete: un documento que junta líneas.
#[derive(Debug, Default)]
pub struct Doc {
    pub lines: Vec<String>,
    /// El predicado de fin del step lo exige en verdadero.
    pub complete: bool,
    /// El predicado de modificación lo exige en verdadero.
    pub touched: bool,
}

type ConstructFn = dyn Fn(&mut StepCx<'_, Doc>) -> Result<Outcome, StepError> + Send + Sync;

/// Step armado con un closure; los predicados miran los flags del `Doc`.
pub struct FnStep {
    id: String,
    construct: Box<ConstructFn>,
}

impl FnStep {
    pub fn new(
        id: impl Into<String>,
        construct: impl Fn(&mut StepCx<'_, Doc>) -> Result<Outcome, StepError> + Send + Sync + 'static,
    ) -> Self {
        Self { id: id.into(), construct: Box::new(construct) }
    }

    /// Step que agrega una línea al doc y sigue.
    pub fn appender(id: &str, line: &str) -> Self {
        let line = line.to_string();
        Self::new(id, move |cx| {
            let doc = cx.response();
            doc.lines.push(line.clone());
            doc.touched = true;
            Ok(Outcome::Continuing(Vec::new()))
        })
    }

    /// Step que declara fin con el doc completo.
    pub fn finisher(id: &str) -> Self {
        Self::new(id, |cx| {
            let doc = cx.response();
            doc.complete = true;
            doc.touched = true;
            Ok(Outcome::Finished)
        })
    }
}

impl StepDef<Doc> for FnStep {
    fn id(&self) -> &str {
        &self.id
    }

    fn construct(&self, cx: &mut StepCx<'_, Doc>) -> Result<Outcome, StepError> {
        (self.construct)(cx)
    }

    fn is_finished(&self, result: Option<&Doc>) -> bool {
        result.map(|d| d.complete).unwrap_or(false)
    }

    fn is_modified(&self, result: &Doc) -> bool {
        result.touched
    }
}

/// Callback que registra cada notificación como una etiqueta.
pub struct Rec(Mutex<Vec<String>>);

impl Rec {
    pub fn new() -> Arc<Self> {
        Arc::new(Rec(Mutex::new(Vec::new())))
    }

    pub fn push(&self, label: impl Into<String>) {
        match self.0.lock() {
            Ok(mut seen) => seen.push(label.into()),
            Err(poisoned) => poisoned.into_inner().push(label.into()),
        }
    }

    pub fn seen(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Sólo las etiquetas terminales.
    pub fn terminals(&self) -> Vec<String> {
        self.seen()
            .into_iter()
            .filter(|l| {
                l.starts_with("done")
                    || l.starts_with("rejected")
                    || l.starts_with("no_response")
                    || l.starts_with("failure")
            })
            .collect()
    }
}

impl Callback<Doc> for Rec {
    fn on_before_run_one(&self, _chain: &relay_core::Chain<Doc>, results: &[Arc<Doc>]) {
        self.push(format!("before:{}", results.len()));
    }

    fn on_after_run_one(
        &self,
        _chain: &relay_core::Chain<Doc>,
        step: &dyn StepDef<Doc>,
        state: &State<Doc>,
    ) {
        self.push(format!("after:{}:{:?}", step.id(), state.tag()));
    }

    fn on_rejected(&self, state: &State<Doc>) {
        self.push(format!("rejected:{}", state.step().id()));
    }

    fn on_done(&self, state: &State<Doc>, results: &[Arc<Doc>]) {
        self.push(format!("done:{}:{}", state.step().id(), results.len()));
    }

    fn on_no_response(&self) {
        self.push("no_response");
    }

    fn on_failure(&self, cause: RunError) {
        self.push(format!("failure:{}", cause.step_id()));
    }
}
