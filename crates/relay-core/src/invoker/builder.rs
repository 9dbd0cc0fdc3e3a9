//! Construcción fluida del `Invoker`.

use std::sync::Arc;

use crate::config::{SyncMode, CONFIG};
use crate::exec::{Executor, InlineExecutor};
use crate::invoker::Invoker;
use crate::scope::{NullScope, RunScope};

/// Builder del motor. Todo es opcional: sin ajustes produce un invoker
/// inline, sin scope, con el modo de scheduling del entorno.
pub struct InvokerBuilder<R> {
    executor: Arc<dyn Executor>,
    scope: Arc<dyn RunScope>,
    sync: SyncMode,
    _result: std::marker::PhantomData<fn() -> R>,
}

impl<R: Send + Sync + 'static> InvokerBuilder<R> {
    pub(crate) fn new() -> Self {
        Self {
            executor: Arc::new(InlineExecutor),
            scope: Arc::new(NullScope),
            sync: CONFIG.sync_mode,
            _result: std::marker::PhantomData,
        }
    }

    /// Executor sobre el que se despachan los ticks (y los resumes).
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// Scope ambiental a re-entrar en cada tick.
    pub fn scope(mut self, scope: Arc<dyn RunScope>) -> Self {
        self.scope = scope;
        self
    }

    /// Fuerza un modo de scheduling, ignorando `CONFIG`.
    pub fn sync_mode(mut self, sync: SyncMode) -> Self {
        self.sync = sync;
        self
    }

    pub fn build(self) -> Invoker<R> {
        Invoker::from_parts(self.executor, self.scope, self.sync)
    }
}

impl<R: Send + Sync + 'static> Default for InvokerBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
