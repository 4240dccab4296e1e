mod post;
mod pre;
mod run;
mod types;

pub use run::run_pipeline;
pub use types::PipelineArgs;
