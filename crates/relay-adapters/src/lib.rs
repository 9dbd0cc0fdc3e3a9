//! relay-adapters: Capa de adaptación Petición ↔ Core
//!
//! Este crate provee:
//! - Tipos de contexto listos para sembrar en la bolsa (`RequestInfo`,
//!   `Principal`, `Annotation`).
//! - Un resultado parcial concreto (`Response`, JSON) para cadenas que
//!   producen respuestas.
//! - Steps de referencia sobre ese resultado: anotación, guardia,
//!   expansión dinámica de cadena, fetch diferido y render final.
//!
//! Nota: el core no conoce nada de esto; sólo ve `StepDef<Response>` y
//! valores `Any` en la bolsa.

pub mod context;
pub mod response;
pub mod steps;

pub use context::{Annotation, FetchedRecord, Principal, RequestInfo};
pub use response::Response;
pub use steps::{AnnotateStep, ExpandStep, FetchStep, GuardStep, RenderStep};
