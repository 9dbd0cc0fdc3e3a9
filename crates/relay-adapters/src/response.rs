//! Resultado parcial concreto para cadenas que arman una respuesta JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Respuesta en construcción. Cada step que la toca debe marcar `modified`;
/// es ese flag el que decide si el parcial entra en la lista de resultados
/// del run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    /// Código HTTP. `None` mientras ningún step haya decidido el desenlace;
    /// el predicado de fin del render se apoya en esto.
    pub status: Option<u16>,
    pub body: Value,
    #[serde(skip)]
    pub modified: bool,
}

impl Response {
    /// Fija el código y marca la respuesta como tocada.
    pub fn set_status(&mut self, status: u16) {
        self.status = Some(status);
        self.modified = true;
    }

    /// Inserta un campo en el cuerpo (lo promueve a objeto si hacía falta).
    pub fn set_field(&mut self, key: &str, value: Value) {
        if !self.body.is_object() {
            self.body = Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.body.as_object_mut() {
            map.insert(key.to_string(), value);
        }
        self.modified = true;
    }

    pub fn is_settled(&self) -> bool {
        self.status.is_some()
    }
}
