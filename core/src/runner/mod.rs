pub mod exit;
mod process;
mod types;

pub use exit::normalize_exit;
pub use process::{ProcessRunner, TokioProcessRunner, CHILD_TARGET};
pub use types::ProcessSpec;
