//! Configuration sections.

mod serve;
mod templates;

pub use serve::ServeConfig;
pub use templates::TemplatesConfig;
