//! Contrato observable de un run, implementado por la aplicación.

use std::sync::Arc;

use crate::chain::Chain;
use crate::errors::RunError;
use crate::model::State;
use crate::step::StepDef;

/// Notificaciones de un run. Exactamente UNO de `on_rejected` / `on_done` /
/// `on_no_response` / `on_failure` dispara por run, exactamente una vez; un
/// run cancelado no dispara ninguno.
///
/// Las notificaciones before/after están estrictamente ordenadas respecto del
/// step que encierran. Las implementaciones no deben bloquear: corren dentro
/// del tick.
pub trait Callback<R>: Send + Sync {
    /// A punto de correr un step (con los fragmentos de resultado juntados
    /// hasta ahora).
    fn on_before_run_one(&self, chain: &Chain<R>, results_so_far: &[Arc<R>]) {
        let _ = (chain, results_so_far);
    }

    /// Un step corrió (incluye al step que rechaza o termina el run).
    fn on_after_run_one(&self, chain: &Chain<R>, step: &dyn StepDef<R>, state: &State<R>) {
        let _ = (chain, step, state);
    }

    /// Terminal: un step rechazó el trabajo. No es un error.
    fn on_rejected(&self, state: &State<R>);

    /// Terminal: un step terminó el trabajo; `results` acumula, en orden de
    /// ejecución, cada resultado parcial cuyo `is_modified` fue verdadero.
    fn on_done(&self, state: &State<R>, results: &[Arc<R>]);

    /// Terminal: la cadena se agotó sin que ningún step reclamara el
    /// trabajo. Distinto de rechazo; tampoco es un error.
    fn on_no_response(&self);

    /// Terminal: fallo capturado (construcción o ejecución de un step).
    fn on_failure(&self, cause: RunError);
}
