use thiserror::Error;

/// The kinds of failure the virtual machine can report. Both are
/// precondition violations at the root-stack boundary; the collector
/// itself has no failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("stack overflow: the root stack is at capacity")]
    StackOverflow,
    #[error("stack underflow: the root stack has too few values")]
    StackUnderflow,
}

/// A tinygc runtime error type
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct RuntimeError {
    kind: ErrorKind,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> RuntimeError {
        RuntimeError { kind }
    }

    pub fn error_kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Convenience function for building a stack-overflow error
pub fn err_overflow() -> RuntimeError {
    RuntimeError::new(ErrorKind::StackOverflow)
}

/// Convenience function for building a stack-underflow error
pub fn err_underflow() -> RuntimeError {
    RuntimeError::new(ErrorKind::StackUnderflow)
}
