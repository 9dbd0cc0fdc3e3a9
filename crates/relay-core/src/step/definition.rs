use crate::errors::StepError;
use crate::model::Outcome;
use crate::step::StepCx;

/// Trait que define un Step. `R` es el tipo concreto de resultado parcial de
/// la aplicación (uno por aplicación; ver `StepCx::response`).
pub trait StepDef<R>: Send + Sync {
    /// Identificador estable, único dentro de la cadena.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Construcción = ejecución. Debe computar el `Outcome` de forma
    /// síncrona usando únicamente `cx`; una suspensión se pide vía
    /// `cx.defer`/`cx.defer_with` ANTES de retornar.
    fn construct(&self, cx: &mut StepCx<'_, R>) -> Result<Outcome, StepError>;

    /// ¿El resultado parcial representa trabajo realmente terminado?
    /// Juicio de dominio sobre los campos del resultado, consultado sólo
    /// cuando el outcome fue `Finished`.
    fn is_finished(&self, result: Option<&R>) -> bool {
        let _ = result;
        true
    }

    /// ¿El resultado parcial fue modificado y debe entrar a la lista
    /// acumulada del run?
    fn is_modified(&self, result: &R) -> bool {
        let _ = result;
        true
    }
}
