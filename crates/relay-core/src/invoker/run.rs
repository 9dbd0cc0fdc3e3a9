//! Estado por run: fases, terminal, núcleo compartido y handle del caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::callback::Callback;
use crate::chain::Chain;
use crate::config::SyncMode;
use crate::exec::Executor;
use crate::model::{ContextBag, State};
use crate::scope::RunScope;

/// Fase de un run.
///
/// Transiciones válidas:
/// - `Ready` -> `Running`
/// - `Running` <-> `Suspended`
/// - `Running` -> `Done` | `Rejected` | `Exhausted` | `Failed` | `Cancelled`
///
/// Todas las fases terminales son finales; cada una (salvo `Cancelled`)
/// dispara exactamente un método terminal del `Callback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Suspended,
    Done,
    Rejected,
    Exhausted,
    Failed,
    Cancelled,
}

/// Desenlace observable desde el `RunHandle`. `Cancelled` es visible aquí
/// aunque no dispare callback alguno.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Done,
    Rejected,
    NoResponse,
    Failed,
    Cancelled,
}

/// Estado mutable de un run, protegido por el lock del núcleo. Lo muta
/// únicamente el tick en ejecución; la contabilidad de suspend/resume pasa
/// por el mismo lock.
pub(crate) struct Run<R> {
    pub(crate) chain: Chain<R>,
    pub(crate) bag: ContextBag,
    pub(crate) results: Vec<Arc<R>>,
    pub(crate) callback: Arc<dyn Callback<R>>,
    pub(crate) phase: Phase,
    /// Continuación capturada al suspender: el `State` del step que difirió,
    /// pendiente de la decisión finalizar/agotar/seguir.
    pub(crate) pending_tail: Option<State<R>>,
    pub(crate) resume_armed: bool,
    /// El deferral es singleton por run.
    pub(crate) deferred_used: bool,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
}

/// Núcleo compartido entre el invoker, los jobs agendados, el `Resumer` y el
/// `RunHandle`.
pub(crate) struct RunCore<R> {
    pub(crate) run_id: Uuid,
    pub(crate) cancelled: AtomicBool,
    pub(crate) state: Mutex<Run<R>>,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) scope: Arc<dyn RunScope>,
    pub(crate) sync: SyncMode,
    pub(crate) done_tx: watch::Sender<Option<Terminal>>,
}

/// Lock con recuperación de poisoning: un panic en un callback ajeno no debe
/// dejar el run inaccesible para `cancel`/`report`.
pub(crate) fn lock_run<R>(core: &RunCore<R>) -> MutexGuard<'_, Run<R>> {
    match core.state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Resumen puntual de un run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub phase: Phase,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Handle que `submit` devuelve al caller.
pub struct RunHandle<R> {
    pub(crate) core: Arc<RunCore<R>>,
    pub(crate) done_rx: watch::Receiver<Option<Terminal>>,
}

impl<R: Send + Sync + 'static> RunHandle<R> {
    pub fn run_id(&self) -> Uuid {
        self.core.run_id
    }

    /// Cancelación cooperativa: levanta la bandera compartida. El run la
    /// chequea en los bordes de tick; un run cancelado no dispara callback.
    pub fn cancel(&self) {
        self.core.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.core.cancelled.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> Phase {
        lock_run(&self.core).phase
    }

    pub fn report(&self) -> RunReport {
        let run = lock_run(&self.core);
        RunReport {
            run_id: self.core.run_id,
            phase: run.phase,
            started_at: run.started_at,
            finished_at: run.finished_at,
        }
    }

    /// Instantánea de los resultados acumulados hasta ahora.
    pub fn results(&self) -> Vec<Arc<R>> {
        lock_run(&self.core).results.clone()
    }

    /// Remanente de la cadena: las entradas aún no consumidas, más el
    /// contexto acumulado del run como contribución estática. Permite
    /// bifurcar el procesamiento restante sin re-correr lo ya hecho.
    pub fn remnant(&self) -> Chain<R> {
        let run = lock_run(&self.core);
        let mut rem = run.chain.remnant();
        // la bolsa arranca con el seed de la cadena ya plegado; el remanente
        // ya lo trae, así que sólo se agregan las contribuciones del run
        let seeded = rem.seed().len();
        for value in run.bag.values().iter().skip(seeded) {
            rem.contribute(Arc::clone(value));
        }
        rem
    }

    /// Desenlace, si el run ya terminó.
    pub fn terminal_now(&self) -> Option<Terminal> {
        *self.done_rx.borrow()
    }

    /// Espera el desenlace del run.
    pub async fn terminal(&mut self) -> Terminal {
        loop {
            if let Some(t) = *self.done_rx.borrow_and_update() {
                return t;
            }
            if self.done_rx.changed().await.is_err() {
                // el sender vive en el núcleo que este handle retiene; si se
                // cerró, el run ya no puede avanzar
                return Terminal::Cancelled;
            }
        }
    }
}
