use std::fmt;

/// Errors raised at the two adapter boundaries that can fail: container decode
/// and setup construction. The simulator core itself is total.
#[derive(Debug)]
pub enum FlakError {
    /// Bad magic, unsupported version, inconsistent sizes, or out-of-range offsets.
    MalformedFile(String),
    /// A setup builder call violated one of its preconditions (owner mismatch,
    /// empty fleet, duplicate/out-of-range player number).
    SetupInvariantViolated(String),
}

impl fmt::Display for FlakError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFile(msg) => write!(f, "malformed FLAK file: {msg}"),
            Self::SetupInvariantViolated(msg) => write!(f, "setup invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for FlakError {}

pub type Result<T> = std::result::Result<T, FlakError>;
