//! daybt-status
//!
//! A single error taxonomy shared by every crate in the workspace, modeled
//! on a well-known RPC status vocabulary. No crate above this one defines
//! its own error enum; they all return `daybt_status::Result<T>`.

use std::fmt;

/// Error code taxonomy. Not every variant is reachable from every
/// component, but the set is shared so callers can match on it uniformly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Code {
    Ok,
    Cancelled,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    DataLoss,
    Unknown,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::DataLoss => "DATA_LOSS",
            Code::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// A structured, user-visible failure. No panics or exceptions are meant
/// to cross a crate boundary in this workspace; everything fallible
/// returns `Result<T, Status>` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub code: Code,
    pub message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(Code::Ok, "ok")
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(Code::AlreadyExists, message)
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(Code::FailedPrecondition, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }

    /// Combine validation failures from a single operation into one
    /// `InvalidArgument` status, reasons joined by `; ` (spec: "all
    /// guards are reported at once" for position-transition validation).
    pub fn combine_invalid_argument(reasons: Vec<String>) -> Self {
        Self::invalid_argument(reasons.join("; "))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Status {}

pub type Result<T> = std::result::Result<T, Status>;
