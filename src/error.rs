//! error.rs — Public error type. Deliberately small: catalog outages and
//! malformed deck entries degrade instead of erroring (see session.rs), so
//! the only thing surfaced to callers is bad input they can correct.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    /// The single offending call is rejected; session state is untouched.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
