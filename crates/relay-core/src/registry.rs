//! Facility de construcción de steps: registro de factories por clave de tipo.
//!
//! Sustituye al contenedor DI de la fuente: una factory explícita por
//! identidad de tipo, que recibe la bolsa de contexto actual y devuelve la
//! instancia construida. Se pobla durante la inicialización (mutable) y se
//! usa en runtime detrás de un `Arc` (inmutable), sin locks.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{ConfigError, RunError, StepError};
use crate::model::ContextBag;
use crate::step::StepDef;

/// Factory de un tipo de step concreto.
///
/// Los errores de la factory se propagan como fallo del run (`RunError::Build`
/// con la causa original como única capa de envoltura).
pub trait StepFactory<R>: Send + Sync {
    fn build(&self, bag: &ContextBag) -> Result<Arc<dyn StepDef<R>>, StepError>;
}

impl<R, F> StepFactory<R> for F
where
    F: Fn(&ContextBag) -> Result<Arc<dyn StepDef<R>>, StepError> + Send + Sync,
{
    fn build(&self, bag: &ContextBag) -> Result<Arc<dyn StepDef<R>>, StepError> {
        self(bag)
    }
}

/// Registro clave -> factory.
pub struct StepRegistry<R> {
    factories: HashMap<String, Box<dyn StepFactory<R>>>,
}

impl<R: Send + Sync + 'static> Default for StepRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + Sync + 'static> StepRegistry<R> {
    pub fn new() -> Self {
        Self { factories: HashMap::new() }
    }

    /// Registra una factory bajo `key`. Clave duplicada es un error de
    /// configuración, no un "last wins" silencioso.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        factory: impl StepFactory<R> + 'static,
    ) -> Result<(), ConfigError> {
        let key = key.into();
        if self.factories.contains_key(&key) {
            return Err(ConfigError::DuplicateFactory(key));
        }
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Azúcar para closures: fija la firma y evita anotar el retorno.
    pub fn register_fn(
        &mut self,
        key: impl Into<String>,
        factory: impl Fn(&ContextBag) -> Result<Arc<dyn StepDef<R>>, StepError>
            + Send
            + Sync
            + 'static,
    ) -> Result<(), ConfigError> {
        self.register(key, factory)
    }

    /// ¿Existe una factory para `key`? Usado por `Chain::add_ref` para
    /// rechazar referencias malformadas en el momento del `add`.
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Construye la instancia para `key` con la bolsa actual.
    pub fn build(&self, key: &str, bag: &ContextBag) -> Result<Arc<dyn StepDef<R>>, RunError> {
        let factory = self.factories.get(key).ok_or_else(|| RunError::Build {
            step: key.to_string(),
            source: Box::new(ConfigError::UnknownStepRef(key.to_string())),
        })?;
        factory.build(bag).map_err(|source| RunError::Build { step: key.to_string(), source })
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
