use std::fmt;
use std::sync::Arc;

use crate::step::StepDef;

/// Una entrada de la cadena: instancia viva o referencia construible.
///
/// La referencia es una clave de identidad de tipo; el `StepRegistry` la
/// materializa bajo demanda durante la iteración, con la bolsa de contexto
/// del momento.
pub enum ChainEntry<R> {
    Ready(Arc<dyn StepDef<R>>),
    Buildable(String),
}

impl<R> Clone for ChainEntry<R> {
    fn clone(&self) -> Self {
        match self {
            ChainEntry::Ready(step) => ChainEntry::Ready(Arc::clone(step)),
            ChainEntry::Buildable(key) => ChainEntry::Buildable(key.clone()),
        }
    }
}

impl<R> fmt::Debug for ChainEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainEntry::Ready(step) => write!(f, "Ready({})", step.id()),
            ChainEntry::Buildable(key) => write!(f, "Buildable({key})"),
        }
    }
}
