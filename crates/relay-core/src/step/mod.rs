//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad cuyo TRABAJO COMPLETO ocurre en su construcción:
//! `construct` inspecciona la bolsa de contexto dejada por los steps previos
//! y devuelve su `Outcome` antes de retornar (no hay fase "execute"
//! separada). Este módulo define:
//! - `StepDef`: interfaz neutral usada por el invoker, con los dos
//!   predicados de dominio (`is_finished`, `is_modified`).
//! - `StepCx`: la vista que la construcción recibe del run (bolsa, resultado
//!   parcial perezoso, inserción en la cadena, deferral).

mod cx;
mod definition;

pub use cx::StepCx;
pub use definition::StepDef;
