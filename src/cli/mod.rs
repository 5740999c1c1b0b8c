//! Command-line interface module.

mod args;
pub mod dump;
pub mod list;
pub mod serve;

pub use args::{Cli, Commands};
