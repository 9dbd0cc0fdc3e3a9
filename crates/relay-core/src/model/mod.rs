//! Modelo de datos del motor: bolsa de contexto y estados de step.

mod context;
mod state;

pub use context::{ctx_value, ContextBag, ContextValue};
pub use state::{Outcome, OutcomeTag, State};
