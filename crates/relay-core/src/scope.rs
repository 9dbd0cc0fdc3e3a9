//! Scope por run: adquisición con teardown garantizado alrededor de cada tick.
//!
//! El invoker re-entra el scope al comienzo de cada tick (y una vez más antes
//! de `on_done`), poniendo los valores de la bolsa ambientalmente disponibles
//! para la facility de construcción. El guard es RAII: el teardown corre al
//! salir del tick por CUALQUIER camino, incluido error.

use uuid::Uuid;

use crate::model::ContextBag;

/// Guard del scope de un tick. Soltar el guard ejecuta el teardown.
pub struct ScopeGuard {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl ScopeGuard {
    /// Guard sin teardown.
    pub fn noop() -> Self {
        Self { teardown: None }
    }

    /// Guard que ejecuta `f` al salir del scope.
    pub fn on_exit(f: impl FnOnce() + Send + 'static) -> Self {
        Self { teardown: Some(Box::new(f)) }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

/// Facility de scope por run.
pub trait RunScope: Send + Sync {
    /// Entra el scope de un tick con los valores acumulados hasta ahora.
    fn enter(&self, run_id: Uuid, bag: &ContextBag) -> ScopeGuard;
}

/// Scope nulo: sin recursos por run.
#[derive(Debug, Default)]
pub struct NullScope;

impl RunScope for NullScope {
    fn enter(&self, _run_id: Uuid, _bag: &ContextBag) -> ScopeGuard {
        ScopeGuard::noop()
    }
}
