use std::process::ExitStatus;

pub const EXIT_OK: i32 = 0;
/// Validation failures, missing output and unrecoverable API failures.
pub const EXIT_FAILURE: i32 = 1;
const SIGNAL_BASE: i32 = 128;

/// Maps a child's status to a shell-style exit code: termination by signal
/// `n` becomes `128 + n`.
pub fn normalize_exit(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        match (status.code(), status.signal()) {
            (Some(code), _) => code,
            (None, Some(sig)) => SIGNAL_BASE + sig,
            (None, None) => EXIT_FAILURE,
        }
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(EXIT_FAILURE)
    }
}
