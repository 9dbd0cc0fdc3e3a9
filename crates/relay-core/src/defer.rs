//! Primitiva de suspensión/reanudación de un run.
//!
//! Un step pide la suspensión durante su construcción (`StepCx::defer` /
//! `defer_with`); el invoker queda estacionado sin retener thread alguno
//! hasta que una fuente externa llame `resume`. El `Resumer` es de un solo
//! uso a nivel de run: la primera reanudación exitosa consume la
//! continuación y las siguientes reportan `NotSuspended` sin re-invocarla.

use std::sync::Arc;

use crate::errors::ConfigError;
use crate::invoker::{self, RunCore};
use crate::model::ContextValue;

/// Código diferido: recibe el `Resumer` y corre estrictamente después de que
/// el constructor del step que difirió haya retornado.
pub type DeferredCode<R> = Box<dyn FnOnce(Resumer<R>) + Send + 'static>;

/// Handle de reanudación de un run suspendido.
pub struct Resumer<R> {
    core: Arc<RunCore<R>>,
}

impl<R> Clone for Resumer<R> {
    fn clone(&self) -> Self {
        Self { core: Arc::clone(&self.core) }
    }
}

impl<R: Send + Sync + 'static> Resumer<R> {
    pub(crate) fn new(core: Arc<RunCore<R>>) -> Self {
        Self { core }
    }

    /// Re-arma el avance del run: pliega `extra` en la bolsa de contexto y
    /// agenda la continuación capturada. Un-solo-uso: tras consumirse, las
    /// llamadas siguientes devuelven `ConfigError::NotSuspended` y la
    /// continuación jamás corre dos veces.
    ///
    /// Si llega antes de que el tick que difirió termine de estacionar el
    /// run, bloquea brevemente sobre el estado del run y luego procede: la
    /// suspensión se publica bajo el mismo lock que corre el tick.
    pub fn resume(&self, extra: Vec<ContextValue>) -> Result<(), ConfigError> {
        invoker::resume_run(Arc::clone(&self.core), extra)
    }

    /// Id del run que este resumer re-arma.
    pub fn run_id(&self) -> uuid::Uuid {
        self.core.run_id
    }
}
