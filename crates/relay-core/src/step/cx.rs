//! Vista de construcción: lo que un step puede hacer MIENTRAS se construye.

use std::any::Any;
use std::sync::Arc;

use uuid::Uuid;

use crate::chain::ChainEntry;
use crate::defer::{DeferredCode, Resumer};
use crate::errors::ConfigError;
use crate::invoker::RunCore;
use crate::model::ContextBag;
use crate::step::StepDef;

/// Contexto entregado a `StepDef::construct`.
///
/// Vive sólo durante la construcción del step; el invoker recoge al retornar
/// el resultado parcial, las inserciones en cadena y la petición de deferral.
pub struct StepCx<'a, R> {
    run_id: Uuid,
    bag: &'a ContextBag,
    pub(crate) response: Option<R>,
    pub(crate) inserts: Vec<ChainEntry<R>>,
    pub(crate) defer_request: Option<Option<DeferredCode<R>>>,
    already_deferred: bool,
    core: Arc<RunCore<R>>,
}

impl<'a, R: Send + Sync + 'static> StepCx<'a, R> {
    pub(crate) fn new(bag: &'a ContextBag, already_deferred: bool, core: Arc<RunCore<R>>) -> Self {
        Self {
            run_id: core.run_id,
            bag,
            response: None,
            inserts: Vec::new(),
            defer_request: None,
            already_deferred,
            core,
        }
    }

    /// Id del run al que pertenece este tick.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Bolsa de contexto completa dejada por los steps previos.
    pub fn bag(&self) -> &ContextBag {
        self.bag
    }

    /// Azúcar: lookup por tipo sobre la bolsa.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.bag.get::<T>()
    }

    /// Resultado parcial del step, instanciado perezosamente en el primer
    /// acceso.
    pub fn response(&mut self) -> &mut R
    where
        R: Default,
    {
        self.response.get_or_insert_with(R::default)
    }

    /// ¿Se creó ya el resultado parcial?
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Inserta una entrada inmediatamente en el cursor de la cadena: correrá
    /// a continuación de este step, antes de lo que ya estaba encolado.
    /// Visible a partir del siguiente tick.
    pub fn insert(&mut self, entry: ChainEntry<R>) {
        self.inserts.push(entry);
    }

    /// Azúcar: inserta una instancia lista.
    pub fn insert_step(&mut self, step: Arc<dyn StepDef<R>>) {
        self.inserts.push(ChainEntry::Ready(step));
    }

    /// Azúcar: inserta una referencia construible. La clave se resuelve
    /// contra el registry recién en su tick; una clave desconocida termina
    /// el run como fallo de build.
    pub fn insert_ref(&mut self, key: impl Into<String>) {
        self.inserts.push(ChainEntry::Buildable(key.into()));
    }

    /// Suspensión "pelada": devuelve el `Resumer` sin ninguna garantía de
    /// orden respecto del propio constructor. Reservada para pasar el
    /// resumer de forma síncrona a una API de terceros; preferir
    /// `defer_with`.
    pub fn defer(&mut self) -> Result<Resumer<R>, ConfigError> {
        self.request_defer(None)
    }

    /// Suspensión preferida: `code` recibe el `Resumer` y corre estrictamente
    /// DESPUÉS de que este constructor haya retornado, eliminando la carrera
    /// entre un resume inmediato y la construcción todavía en curso.
    pub fn defer_with<F>(&mut self, code: F) -> Result<Resumer<R>, ConfigError>
    where
        F: FnOnce(Resumer<R>) + Send + 'static,
    {
        self.request_defer(Some(Box::new(code)))
    }

    fn request_defer(&mut self, code: Option<DeferredCode<R>>) -> Result<Resumer<R>, ConfigError> {
        if self.already_deferred || self.defer_request.is_some() {
            return Err(ConfigError::AlreadyDeferred);
        }
        self.defer_request = Some(code);
        Ok(Resumer::new(Arc::clone(&self.core)))
    }
}
