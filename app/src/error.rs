use std::time::Duration;

use thiserror::Error;

/// Why a remote call made by a controller did not produce a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("{label} timed out after {after:?}")]
    TimedOut { label: &'static str, after: Duration },

    #[error("{0} abandoned: controller unmounted")]
    Cancelled(&'static str),
}
