//! El invoker: submit, ticks, suspensión/reanudación y terminales.

mod builder;
mod engine;
mod run;

pub use builder::InvokerBuilder;
pub use engine::Invoker;
pub use run::{Phase, RunHandle, RunReport, Terminal};

pub(crate) use engine::resume_run;
pub(crate) use run::RunCore;
