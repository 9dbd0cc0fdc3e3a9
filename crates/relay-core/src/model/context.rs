//! Bolsa de contexto acumulada a lo largo de un run.
//!
//! Colección append-only de valores opacos indexados por tipo. Las
//! contribuciones posteriores del mismo tipo ensombrecen a las anteriores
//! para lookup, pero todas se retienen en orden de inserción: la bolsa
//! completa es lo que recibe la construcción del siguiente step.
//!
//! Propiedad: la bolsa pertenece en exclusiva al run que la enhebra entre
//! steps; nunca la mutan dos ticks del mismo run a la vez.

use std::any::Any;
use std::sync::Arc;

/// Valor opaco de contexto. `Arc` porque el mismo valor puede quedar
/// referenciado por la bolsa, por un remnant y por el caller que lo aportó.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Envuelve un valor concreto como `ContextValue`.
#[inline]
pub fn ctx_value<T: Any + Send + Sync>(value: T) -> ContextValue {
    Arc::new(value)
}

/// Bolsa de contexto de un run (o del sufijo de un run, para un remnant).
#[derive(Default, Clone)]
pub struct ContextBag {
    values: Vec<ContextValue>,
}

impl ContextBag {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Agrega un valor al final. Nunca deduplica.
    pub fn contribute(&mut self, value: ContextValue) {
        self.values.push(value);
    }

    /// Azúcar para contribuir un valor concreto sin envolverlo a mano.
    pub fn contribute_value<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(ctx_value(value));
    }

    /// Lookup por tipo: devuelve la contribución MÁS RECIENTE de tipo `T`.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.values
            .iter()
            .rev()
            .find_map(|v| Arc::clone(v).downcast::<T>().ok())
    }

    /// Todas las contribuciones de tipo `T`, en orden de inserción.
    pub fn get_all<T: Any + Send + Sync>(&self) -> Vec<Arc<T>> {
        self.values
            .iter()
            .filter_map(|v| Arc::clone(v).downcast::<T>().ok())
            .collect()
    }

    /// Vista cruda en orden de inserción (para scopes y factories).
    pub fn values(&self) -> &[ContextValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);
    #[derive(Debug, PartialEq)]
    struct Other(&'static str);

    #[test]
    fn lookup_devuelve_el_mas_reciente() {
        let mut bag = ContextBag::new();
        bag.contribute_value(Marker(1));
        bag.contribute_value(Other("x"));
        bag.contribute_value(Marker(2));

        assert_eq!(bag.get::<Marker>().map(|m| m.0), Some(2));
        assert_eq!(bag.get::<Other>().map(|o| o.0), Some("x"));
        assert!(bag.get::<String>().is_none());
    }

    #[test]
    fn retiene_todas_las_contribuciones_en_orden() {
        let mut bag = ContextBag::new();
        bag.contribute_value(Marker(1));
        bag.contribute_value(Marker(2));
        bag.contribute_value(Marker(3));

        let all: Vec<u32> = bag.get_all::<Marker>().iter().map(|m| m.0).collect();
        assert_eq!(all, vec![1, 2, 3]);
        assert_eq!(bag.len(), 3);
    }
}
