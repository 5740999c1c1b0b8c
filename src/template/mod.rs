//! Asset formulas declared in templates.

mod discover;
mod parse;

pub use discover::discover;
pub use parse::{FormulaLoader, TemplateFunction};
