pub mod load;
mod paths;
mod types;

pub use load::{load_default, validate};
pub use paths::RunPaths;
pub use types::*;
