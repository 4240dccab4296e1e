//! Run-completion decision procedure.

mod classifier;
pub mod results;
pub mod signal;

pub use classifier::{classify, OutcomeRecord, OutcomeStatus, RunResult};
pub use results::{count_successes, summarize_results, ResultsSummary};
pub use signal::{LogSignal, SignalMatcher, SignalSet};
