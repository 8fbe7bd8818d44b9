//! Booking table fetch and cache error types.

/// Kinds of booking errors.
///
/// Everything except [`SrcErrorKind::UnknownFacility`] means a table could not
/// be obtained, and the cache treats all of those alike.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SrcErrorKind {
    /// Request could not be sent or the body could not be read
    #[display("Failed to fetch booking table: {}", _0)]
    Fetch(String),
    /// Booking site answered with a non-success status
    #[display("Booking site returned status {}", _0)]
    Status(u16),
    /// Request exceeded the fetch timeout (seconds)
    #[display("Fetch timed out after {}s", _0)]
    Timeout(u64),
    /// Page did not contain a booking table
    #[display("No booking table found in page")]
    TableNotFound,
    /// Table shape does not match the facility
    #[display("Malformed booking table: {}", _0)]
    Format(String),
    /// Facility index out of range
    #[display("Unknown facility: {}", _0)]
    UnknownFacility(usize),
    /// A refresh worker panicked or was cancelled
    #[display("Refresh worker failed: {}", _0)]
    Join(String),
}

/// Booking error with location tracking.
///
/// # Examples
///
/// ```
/// use canoebot_error::{SrcError, SrcErrorKind};
///
/// let err = SrcError::new(SrcErrorKind::Status(503));
/// assert!(format!("{}", err).contains("503"));
/// assert!(err.is_fetch_failure());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("SRC Error: {} at line {} in {}", kind, line, file)]
pub struct SrcError {
    /// The kind of error that occurred
    pub kind: SrcErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SrcError {
    /// Create a new booking error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SrcErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SrcErrorKind {
        &self.kind
    }

    /// True when no usable table came back from the booking site.
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self.kind, SrcErrorKind::UnknownFacility(_))
    }
}
