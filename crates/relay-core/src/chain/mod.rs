//! Cadena de steps: secuencia ordenada y mutable de descriptores.
//!
//! Cada entrada es una instancia lista o una referencia construible (clave
//! resuelta contra el `StepRegistry` bajo demanda, con la bolsa actual).
//! Invariantes:
//! - el cursor (entradas consumidas) es monótono no-decreciente;
//! - `insert` sólo afecta entradas en o después del cursor;
//! - lo anterior al cursor es historia inmutable.

mod entry;

pub use entry::ChainEntry;

use std::sync::Arc;

use crate::errors::{ConfigError, RunError};
use crate::model::{ContextBag, ContextValue};
use crate::registry::StepRegistry;
use crate::step::StepDef;

/// Secuencia mutable de descriptores de step, consumida por el invoker.
pub struct Chain<R> {
    registry: Arc<StepRegistry<R>>,
    entries: Vec<ChainEntry<R>>,
    /// Contribución de contexto propia de la cadena (estática, se pliega una
    /// sola vez al inicio del run).
    seed: Vec<ContextValue>,
    cursor: usize,
    /// Entradas insertadas desde el último avance del cursor; las
    /// inserciones sucesivas de un mismo tick preservan su orden de llamada.
    inserted_since_take: usize,
    active: bool,
}

impl<R: Send + Sync + 'static> Chain<R> {
    pub fn new(registry: Arc<StepRegistry<R>>) -> Self {
        Self {
            registry,
            entries: Vec::new(),
            seed: Vec::new(),
            cursor: 0,
            inserted_since_take: 0,
            active: false,
        }
    }

    /// Agrega una instancia lista al final.
    pub fn add(&mut self, step: impl StepDef<R> + 'static) {
        self.entries.push(ChainEntry::Ready(Arc::new(step)));
    }

    /// Agrega una instancia ya compartida al final.
    pub fn add_arc(&mut self, step: Arc<dyn StepDef<R>>) {
        self.entries.push(ChainEntry::Ready(step));
    }

    /// Agrega una referencia construible al final. La clave se valida contra
    /// el registry en este momento: una referencia malformada es un error de
    /// configuración fatal, no un fallo diferido.
    pub fn add_ref(&mut self, key: impl Into<String>) -> Result<(), ConfigError> {
        let key = key.into();
        if !self.registry.contains(&key) {
            return Err(ConfigError::UnknownStepRef(key));
        }
        self.entries.push(ChainEntry::Buildable(key));
        Ok(())
    }

    /// Aporta un valor a la contribución estática de la cadena.
    pub fn contribute(&mut self, value: ContextValue) {
        self.seed.push(value);
    }

    pub fn seed(&self) -> &[ContextValue] {
        &self.seed
    }

    /// Inserta inmediatamente en el cursor actual. Sólo legal con un run en
    /// curso (sin cursor activo no hay "posición actual").
    pub fn insert(&mut self, entry: ChainEntry<R>) -> Result<(), ConfigError> {
        if !self.active {
            return Err(ConfigError::NoActiveCursor);
        }
        let at = self.cursor + self.inserted_since_take;
        self.entries.insert(at, entry);
        self.inserted_since_take += 1;
        Ok(())
    }

    /// Cantidad total de entradas (consumidas + pendientes).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entradas consumidas hasta ahora.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// ¿Queda al menos una entrada sin consumir?
    pub fn has_next(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Marca el inicio del run: habilita `insert`.
    pub(crate) fn begin_run(&mut self) {
        self.active = true;
    }

    /// Consume la siguiente entrada, construyéndola bajo demanda si es una
    /// referencia. Precondición: `has_next()`.
    pub(crate) fn take_next(&mut self, bag: &ContextBag) -> Result<Arc<dyn StepDef<R>>, RunError> {
        let entry = self.entries[self.cursor].clone();
        self.cursor += 1;
        self.inserted_since_take = 0;
        match entry {
            ChainEntry::Ready(step) => Ok(step),
            ChainEntry::Buildable(key) => self.registry.build(&key, bag),
        }
    }

    /// Remanente: una cadena NUEVA sobre las entradas aún no consumidas,
    /// copiada para que mutar el remanente jamás afecte a la original. El
    /// cursor arranca en cero; la contribución estática se conserva.
    pub fn remnant(&self) -> Chain<R> {
        Chain {
            registry: Arc::clone(&self.registry),
            entries: self.entries[self.cursor..].to_vec(),
            seed: self.seed.clone(),
            cursor: 0,
            inserted_since_take: 0,
            active: false,
        }
    }
}
