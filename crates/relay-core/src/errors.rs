//! Errores específicos del core.
//!
//! Dos familias, con políticas de propagación distintas:
//! - `ConfigError`: mal uso de la API (cadena, registry, deferral). Fatal en
//!   el call site que lo provocó; nunca se reintenta ni se entrega por
//!   callback.
//! - `RunError`: fallo capturado por el invoker durante un run (construcción
//!   o ejecución de un step). Se entrega exactamente una vez vía
//!   `Callback::on_failure` y el run termina.

use thiserror::Error;

/// Causa opaca producida por un step o por una factory.
pub type StepError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errores de configuración: detectados en el call site, fatales.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Referencia a un step no registrado en el `StepRegistry`.
    #[error("unknown step reference '{0}' (not registered)")]
    UnknownStepRef(String),
    /// Intento de registrar dos factories bajo la misma clave.
    #[error("duplicate step factory '{0}'")]
    DuplicateFactory(String),
    /// `insert` exige un run en curso (cursor activo).
    #[error("insert requires a run in progress (no active cursor)")]
    NoActiveCursor,
    /// Segundo `defer` dentro del mismo run.
    #[error("defer already requested for this run")]
    AlreadyDeferred,
    /// `resume` sobre un run que no está suspendido (nunca difirió, o la
    /// continuación ya fue consumida).
    #[error("run is not suspended (never deferred, or resume already consumed)")]
    NotSuspended,
}

/// Fallo terminal de un run, entregado vía `on_failure`.
///
/// La facility de construcción envuelve la causa original una sola vez; el
/// invoker la entrega con esa única capa (`source()` expone la causa).
#[derive(Debug, Error)]
pub enum RunError {
    /// La factory registrada para `step` no pudo construir la instancia.
    #[error("step build failed for '{step}': {source}")]
    Build {
        step: String,
        #[source]
        source: StepError,
    },
    /// El step se construyó pero su ejecución devolvió error.
    #[error("step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: StepError,
    },
}

impl RunError {
    /// Identificador del step que originó el fallo.
    pub fn step_id(&self) -> &str {
        match self {
            RunError::Build { step, .. } | RunError::Step { step, .. } => step,
        }
    }
}
