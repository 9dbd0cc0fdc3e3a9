//! relay-core: Motor de cadenas encadenadas con suspensión cooperativa
pub mod callback;
pub mod chain;
pub mod config;
pub mod defer;
pub mod errors;
pub mod exec;
pub mod invoker;
pub mod model;
pub mod registry;
pub mod scope;
pub mod step;

pub use callback::Callback;
pub use chain::{Chain, ChainEntry};
pub use config::{EngineConfig, SyncMode, CONFIG};
pub use defer::Resumer;
pub use errors::{ConfigError, RunError, StepError};
pub use exec::{Executor, InlineExecutor, QueueExecutor, TokioExecutor};
pub use invoker::{Invoker, InvokerBuilder, Phase, RunHandle, RunReport, Terminal};
pub use model::{ctx_value, ContextBag, ContextValue, Outcome, OutcomeTag, State};
pub use registry::{StepFactory, StepRegistry};
pub use scope::{NullScope, RunScope, ScopeGuard};
pub use step::{StepCx, StepDef};
