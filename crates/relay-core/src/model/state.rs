//! Outcome de un step y `State` observable.
//!
//! `Outcome` es lo que devuelve la construcción de un step; `State` es el
//! valor inmutable que el invoker registra y entrega por callback, con
//! back-reference al step que lo produjo. La indirección existe porque
//! "terminado" es un juicio de dominio sobre los campos del resultado
//! parcial, no un tag fijo: el `State` delega en los predicados del step.

use std::sync::Arc;

use crate::model::ContextValue;
use crate::step::StepDef;

/// Resultado de construir un step.
pub enum Outcome {
    /// Terminal: ningún step posterior corre.
    Rejected,
    /// El step no terminó el trabajo; sus contribuciones se pliegan en la
    /// bolsa antes del siguiente step.
    Continuing(Vec<ContextValue>),
    /// El step cree que el trabajo global está hecho. El resultado parcial
    /// (si lo creó vía `StepCx::response`) queda registrado en el `State`.
    Finished,
}

/// Tag compacto del outcome, una vez consumidas las contribuciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeTag {
    Rejected,
    Continuing,
    Finished,
}

/// Estado inmutable de un step ya ejecutado.
pub struct State<R> {
    step: Arc<dyn StepDef<R>>,
    tag: OutcomeTag,
    result: Option<Arc<R>>,
}

impl<R: Send + Sync + 'static> State<R> {
    pub(crate) fn new(step: Arc<dyn StepDef<R>>, tag: OutcomeTag, result: Option<Arc<R>>) -> Self {
        Self { step, tag, result }
    }

    /// Step que produjo este estado.
    pub fn step(&self) -> &Arc<dyn StepDef<R>> {
        &self.step
    }

    pub fn tag(&self) -> OutcomeTag {
        self.tag
    }

    pub fn is_rejected(&self) -> bool {
        self.tag == OutcomeTag::Rejected
    }

    pub fn is_continuing(&self) -> bool {
        self.tag == OutcomeTag::Continuing
    }

    /// El step DECLARÓ haber terminado (tag `Finished`). No implica que el
    /// predicado de dominio esté de acuerdo; ver `is_finished`.
    pub fn claims_finished(&self) -> bool {
        self.tag == OutcomeTag::Finished
    }

    /// Juicio definitivo de terminación: tag `Finished` Y el predicado del
    /// step propietario sobre el resultado parcial.
    pub fn is_finished(&self) -> bool {
        self.claims_finished() && self.step.is_finished(self.result.as_deref())
    }

    /// Resultado parcial creado por el step, si existe.
    pub fn result(&self) -> Option<&Arc<R>> {
        self.result.as_ref()
    }
}
