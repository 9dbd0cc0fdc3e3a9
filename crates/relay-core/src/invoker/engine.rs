//! Invoker: el motor que conduce una cadena, tick a tick.
//!
//! Un run avanza estrictamente secuencial (a lo sumo un step en construcción
//! por run), pero muchos runs independientes corren concurrentes, cada tick
//! despachado al executor; los ticks de un mismo run pueden saltar de thread
//! entre suspensiones. Mientras está suspendido, el run no retiene thread:
//! queda estacionado como estado capturado hasta el `resume` externo.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use tokio::sync::watch;
use uuid::Uuid;

use crate::callback::Callback;
use crate::chain::Chain;
use crate::config::{SyncMode, CONFIG};
use crate::defer::{DeferredCode, Resumer};
use crate::errors::{ConfigError, RunError};
use crate::exec::{Executor, InlineExecutor};
use crate::invoker::builder::InvokerBuilder;
use crate::invoker::run::{lock_run, Phase, Run, RunCore, RunHandle, Terminal};
use crate::model::{ContextBag, ContextValue, Outcome, OutcomeTag, State};
use crate::scope::{NullScope, RunScope};
use crate::step::StepCx;

/// Motor de ejecución de cadenas.
///
/// Inmutable y compartible: cada `submit` crea un run independiente con su
/// propia bolsa, su cursor y su contabilidad de suspensión.
pub struct Invoker<R> {
    executor: Arc<dyn Executor>,
    scope: Arc<dyn RunScope>,
    sync: SyncMode,
    _result: std::marker::PhantomData<fn() -> R>,
}

impl<R: Send + Sync + 'static> Default for Invoker<R> {
    fn default() -> Self {
        Invoker::builder().build()
    }
}

impl<R: Send + Sync + 'static> Invoker<R> {
    /// Builder con defaults: executor inline, scope nulo, modo de
    /// scheduling tomado de `CONFIG`.
    pub fn builder() -> InvokerBuilder<R> {
        InvokerBuilder::new()
    }

    pub(crate) fn from_parts(
        executor: Arc<dyn Executor>,
        scope: Arc<dyn RunScope>,
        sync: SyncMode,
    ) -> Self {
        Self { executor, scope, sync, _result: std::marker::PhantomData }
    }

    pub fn sync_mode(&self) -> SyncMode {
        self.sync
    }

    /// Somete una cadena con su callback y arranca el run.
    ///
    /// La contribución estática de la cadena se pliega en la bolsa una sola
    /// vez, aquí. Según el modo: `Queued` agenda el primer tick en el
    /// executor; `FirstSync`/`AllSync` lo corren inline en este thread.
    pub fn submit(&self, mut chain: Chain<R>, callback: Arc<dyn Callback<R>>) -> RunHandle<R> {
        let run_id = Uuid::new_v4();
        let mut bag = ContextBag::new();
        for value in chain.seed() {
            bag.contribute(Arc::clone(value));
        }
        chain.begin_run();

        let (done_tx, done_rx) = watch::channel(None);
        let core = Arc::new(RunCore {
            run_id,
            cancelled: std::sync::atomic::AtomicBool::new(false),
            state: std::sync::Mutex::new(Run {
                chain,
                bag,
                results: Vec::new(),
                callback,
                phase: Phase::Ready,
                pending_tail: None,
                resume_armed: false,
                deferred_used: false,
                started_at: Utc::now(),
                finished_at: None,
            }),
            executor: Arc::clone(&self.executor),
            scope: Arc::clone(&self.scope),
            sync: self.sync,
            done_tx,
        });

        debug!("run {run_id}: submitted");
        match self.sync {
            SyncMode::Queued => schedule(&core),
            SyncMode::FirstSync | SyncMode::AllSync => drive(Arc::clone(&core)),
        }

        RunHandle { core, done_rx }
    }
}

/// Convenience: invoker listo para usar con el executor dado.
impl<R: Send + Sync + 'static> Invoker<R> {
    pub fn with_executor(executor: Arc<dyn Executor>) -> Self {
        Self::from_parts(executor, Arc::new(NullScope), CONFIG.sync_mode)
    }

    pub fn inline() -> Self {
        Self::from_parts(Arc::new(InlineExecutor), Arc::new(NullScope), SyncMode::AllSync)
    }
}

/// Salida de un tick, decidida con el lock del run tomado.
enum TickExit<R> {
    /// Hay más trabajo: agendar (o encadenar inline) el siguiente tick.
    Continue,
    /// Run suspendido. El código diferido, si lo hay, se invoca DESPUÉS de
    /// soltar el lock, garantizando que el constructor que difirió ya
    /// retornó.
    Parked(Option<(DeferredCode<R>, Resumer<R>)>),
    /// Fase terminal alcanzada (o cancelación silenciosa).
    Terminal,
}

/// Agenda un avance del run en el executor.
fn schedule<R: Send + Sync + 'static>(core: &Arc<RunCore<R>>) {
    let next = Arc::clone(core);
    core.executor.execute(Box::new(move || drive(next)));
}

/// Conduce el run: corre un tick y, según el modo, encadena inline o
/// re-agenda. Retorna al suspender, al terminar, o tras delegar al executor.
pub(crate) fn drive<R: Send + Sync + 'static>(core: Arc<RunCore<R>>) {
    loop {
        match run_one_tick(&core) {
            TickExit::Terminal => return,
            TickExit::Parked(deferred) => {
                if let Some((code, resumer)) = deferred {
                    // fuera del lock: el constructor ya retornó y la
                    // suspensión ya está publicada
                    code(resumer);
                }
                return;
            }
            TickExit::Continue => {
                if core.sync == SyncMode::AllSync {
                    continue;
                }
                schedule(&core);
                return;
            }
        }
    }
}

/// Un tick de progreso (algoritmo §"un paso"): chequeo de cancelación,
/// re-entrada de scope, bracket before/after, construcción del step, pliegue
/// de contribuciones, y decisión rechazo/suspensión/fin/agotamiento.
fn run_one_tick<R: Send + Sync + 'static>(core: &Arc<RunCore<R>>) -> TickExit<R> {
    let mut run = lock_run(core);

    // cancelación cooperativa, sólo en bordes de tick
    if core.cancelled.load(Ordering::SeqCst) {
        return settle_cancelled(&mut run, core);
    }

    // continuación capturada por una suspensión previa
    if let Some(state) = run.pending_tail.take() {
        run.phase = Phase::Running;
        return finish_tail(&mut run, core, state);
    }

    run.phase = Phase::Running;
    let _scope = core.scope.enter(core.run_id, &run.bag);

    // agotamiento: la cadena corrió entera sin que nadie reclamara el
    // trabajo; terminal distinto de `Done`
    if !run.chain.has_next() {
        debug!("run {}: chain exhausted after {} steps", core.run_id, run.chain.cursor());
        run.callback.on_no_response();
        return settle(&mut run, core, Phase::Exhausted, Terminal::NoResponse);
    }

    run.callback.on_before_run_one(&run.chain, &run.results);

    // siguiente entrada; una referencia construible se materializa acá, con
    // la bolsa actual ambientalmente disponible
    let step = {
        let Run { chain, bag, .. } = &mut *run;
        match chain.take_next(bag) {
            Ok(step) => step,
            Err(cause) => return settle_failure(&mut run, core, cause),
        }
    };
    let step_id = step.id().to_string();

    // construcción = ejecución del step
    let (outcome, response, inserts, defer_request) = {
        let mut cx = StepCx::new(&run.bag, run.deferred_used, Arc::clone(core));
        let outcome = step.construct(&mut cx);
        (outcome, cx.response, cx.inserts, cx.defer_request)
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(source) => {
            return settle_failure(&mut run, core, RunError::Step { step: step_id, source })
        }
    };

    // re-chequeo: cancelado mientras el step corría; no se compromete nada
    if core.cancelled.load(Ordering::SeqCst) {
        return settle_cancelled(&mut run, core);
    }

    let result = response.map(Arc::new);
    let tag = match &outcome {
        Outcome::Rejected => OutcomeTag::Rejected,
        Outcome::Continuing(_) => OutcomeTag::Continuing,
        Outcome::Finished => OutcomeTag::Finished,
    };
    let state = State::new(Arc::clone(&step), tag, result.clone());

    if let Outcome::Continuing(contributions) = outcome {
        for value in contributions {
            run.bag.contribute(value);
        }
    }

    if !state.is_rejected() {
        // resultado en orden de ejecución, filtrado por el predicado del step
        if let Some(result) = &result {
            if step.is_modified(result) {
                run.results.push(Arc::clone(result));
            }
        }
        // inserciones del step, en el cursor, visibles desde el próximo tick
        for entry in inserts {
            let _inserted = run.chain.insert(entry);
            debug_assert!(_inserted.is_ok(), "run is in progress");
        }
    }

    run.callback.on_after_run_one(&run.chain, step.as_ref(), &state);

    if state.is_rejected() {
        debug!("run {}: rejected by step '{}'", core.run_id, step_id);
        run.callback.on_rejected(&state);
        return settle(&mut run, core, Phase::Rejected, Terminal::Rejected);
    }

    if let Some(code) = defer_request {
        run.deferred_used = true;
        run.resume_armed = true;
        run.pending_tail = Some(state);
        run.phase = Phase::Suspended;
        debug!("run {}: suspended by step '{}'", core.run_id, step_id);
        let parked = code.map(|code| (code, Resumer::new(Arc::clone(core))));
        return TickExit::Parked(parked);
    }

    finish_tail(&mut run, core, state)
}

/// Cola del tick: decisión fin / seguir. El agotamiento se detecta al
/// comienzo del tick siguiente, de modo que el bracket before/after quede
/// estrictamente apareado con las construcciones.
fn finish_tail<R: Send + Sync + 'static>(
    run: &mut Run<R>,
    core: &Arc<RunCore<R>>,
    state: State<R>,
) -> TickExit<R> {
    if state.is_finished() {
        // re-entrada extra: la decoración del resultado corre con el
        // contexto acumulado completo
        let _scope = core.scope.enter(core.run_id, &run.bag);
        debug!(
            "run {}: done via step '{}' with {} result(s)",
            core.run_id,
            state.step().id(),
            run.results.len()
        );
        run.callback.on_done(&state, &run.results);
        return settle(run, core, Phase::Done, Terminal::Done);
    }
    TickExit::Continue
}

fn settle<R: Send + Sync + 'static>(
    run: &mut Run<R>,
    core: &Arc<RunCore<R>>,
    phase: Phase,
    terminal: Terminal,
) -> TickExit<R> {
    run.phase = phase;
    run.finished_at = Some(Utc::now());
    let _ = core.done_tx.send(Some(terminal));
    TickExit::Terminal
}

/// Cancelación: terminal SILENCIOSO — ningún callback dispara; el desenlace
/// sólo es visible desde el handle.
fn settle_cancelled<R: Send + Sync + 'static>(
    run: &mut Run<R>,
    core: &Arc<RunCore<R>>,
) -> TickExit<R> {
    debug!("run {}: cancelled at tick boundary", core.run_id);
    run.phase = Phase::Cancelled;
    run.finished_at = Some(Utc::now());
    let _ = core.done_tx.send(Some(Terminal::Cancelled));
    TickExit::Terminal
}

fn settle_failure<R: Send + Sync + 'static>(
    run: &mut Run<R>,
    core: &Arc<RunCore<R>>,
    cause: RunError,
) -> TickExit<R> {
    warn!("run {}: failed: {cause}", core.run_id);
    run.callback.on_failure(cause);
    settle(run, core, Phase::Failed, Terminal::Failed)
}

/// Reanuda un run suspendido: pliega `extra` en la bolsa y agenda la
/// continuación capturada. One-shot por consumo de `resume_armed`; la
/// continuación nunca se re-invoca.
pub(crate) fn resume_run<R: Send + Sync + 'static>(
    core: Arc<RunCore<R>>,
    extra: Vec<ContextValue>,
) -> Result<(), ConfigError> {
    {
        let mut run = lock_run(&core);
        if run.phase != Phase::Suspended || !run.resume_armed {
            return Err(ConfigError::NotSuspended);
        }
        run.resume_armed = false;
        run.phase = Phase::Running;
        for value in extra {
            run.bag.contribute(value);
        }
        debug!("run {}: resumed", core.run_id);
    }
    if core.sync == SyncMode::AllSync {
        drive(core);
    } else {
        schedule(&core);
    }
    Ok(())
}
