//! Steps de referencia sobre `Response`.

mod annotate;
mod expand;
mod fetch;
mod guard;
mod render;

pub use annotate::AnnotateStep;
pub use expand::ExpandStep;
pub use fetch::FetchStep;
pub use guard::GuardStep;
pub use render::RenderStep;
