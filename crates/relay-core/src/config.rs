//! Configuración del motor vía variables de entorno.
//!
//! Carga perezosa (`once_cell::Lazy`); los binarios cargan `.env` con
//! `dotenvy` antes de tocar `CONFIG`. La única perilla del core es el modo
//! de scheduling de ticks, que no altera el orden observable de callbacks.

use once_cell::sync::Lazy;
use std::env;

/// Modo de scheduling de los ticks de un run.
///
/// Los tres modos preservan semántica idéntica de orden y callbacks; sólo
/// cambia en qué thread corre cada tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Todos los ticks se despachan al `Executor` (default).
    Queued,
    /// El primer tick corre inline en el thread que llamó `submit`.
    FirstSync,
    /// Todos los ticks corren inline (submit y resume avanzan en su propio
    /// thread hasta suspensión o estado terminal).
    AllSync,
}

impl SyncMode {
    /// Parsea la etiqueta textual usada en `RELAY_SYNC_MODE`.
    /// Valores no reconocidos caen en `Queued`.
    pub fn parse(label: &str) -> SyncMode {
        match label.trim().to_ascii_lowercase().as_str() {
            "all" | "all_sync" => SyncMode::AllSync,
            "first" | "first_sync" => SyncMode::FirstSync,
            _ => SyncMode::Queued,
        }
    }
}

/// Configuración global del motor.
pub struct EngineConfig {
    /// Modo de scheduling por defecto para invokers construidos sin override.
    pub sync_mode: SyncMode,
}

impl EngineConfig {
    /// Lee la configuración desde el entorno, con defaults seguros.
    pub fn from_env() -> Self {
        let sync_mode = env::var("RELAY_SYNC_MODE")
            .map(|v| SyncMode::parse(&v))
            .unwrap_or(SyncMode::Queued);
        EngineConfig { sync_mode }
    }
}

/// Instancia global perezosa, evaluada una sola vez.
pub static CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::from_env);
