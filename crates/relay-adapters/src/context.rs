//! Tipos de contexto: lo que viaja por la bolsa entre steps.
//!
//! Son datos planos y serializables; la bolsa los guarda detrás de `Arc`,
//! así que clonar una entrada es barato.

use serde::{Deserialize, Serialize};

/// Descripción de la petición entrante. Normalmente sembrada como
/// contribución estática de la cadena antes de correr.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

impl RequestInfo {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: "GET".to_string(), path: path.into(), query: None }
    }
}

/// Identidad autenticada. Su ausencia en la bolsa es lo que un step de
/// guardia típicamente convierte en rechazo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Nota libre dejada por un step intermedio; el render las recolecta todas
/// en orden de contribución.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub label: String,
}

impl Annotation {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

/// Registro traído por un fetch diferido; llega a la bolsa como contexto
/// extra del `resume`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedRecord {
    pub id: String,
    pub payload: serde_json::Value,
}
