//! Asset model and the machinery that builds assets from formulas.
//!
//! ```text
//! asset/
//! ├── model    # Asset: file or collection, filters, target path
//! ├── formula  # Formula: inputs + filter names + options
//! ├── factory  # Formula → Asset (globs, @refs, naming, workers)
//! ├── manager  # Named formulas, lazy creation
//! ├── worker   # Post-creation hooks (PrefixWorker)
//! ├── writer   # Asset → file under output_dir
//! └── vars     # {var} placeholders
//! ```

mod error;
mod factory;
mod formula;
mod manager;
mod model;
pub mod vars;
mod worker;
mod writer;

pub use error::AssetError;
pub use factory::AssetFactory;
pub use formula::{DEFAULT_OUTPUT, Formula};
pub use manager::AssetManager;
pub use model::Asset;
pub use worker::{PrefixWorker, Worker};
pub use writer::AssetWriter;
