use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn process: {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error while streaming: {stream}")]
    StreamIo {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for process: {program}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
