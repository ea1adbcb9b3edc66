pub mod params;
pub mod template;

// Foundation crate: small, well-tested primitives only.
pub use params::*;
pub use template::{TemplateError, format, placeholders};
