//! Top-level error wrapper types.

use crate::{CommandError, ConfigError, SrcError};

/// Every error the workspace can produce.
///
/// # Examples
///
/// ```
/// use canoebot_error::{CanoebotError, ConfigError};
///
/// let err: CanoebotError = ConfigError::new("long_ttl_secs", "must be positive").into();
/// assert!(format!("{}", err).contains("Invalid configuration [long_ttl_secs]"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CanoebotErrorKind {
    /// Booking fetch, format or cache error
    #[from(SrcError)]
    Src(SrcError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Command handling error
    #[from(CommandError)]
    Command(CommandError),
}

/// Canoebot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Canoebot Error: {}", _0)]
pub struct CanoebotError(Box<CanoebotErrorKind>);

impl CanoebotError {
    /// Create a new error from a kind.
    pub fn new(kind: CanoebotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CanoebotErrorKind {
        &self.0
    }

    /// The booking error inside, if this is one.
    pub fn as_src(&self) -> Option<&SrcError> {
        match self.kind() {
            CanoebotErrorKind::Src(e) => Some(e),
            _ => None,
        }
    }

    /// The configuration error inside, if this is one.
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self.kind() {
            CanoebotErrorKind::Config(e) => Some(e),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to CanoebotErrorKind
impl<T> From<T> for CanoebotError
where
    T: Into<CanoebotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for canoebot operations.
pub type CanoebotResult<T> = std::result::Result<T, CanoebotError>;
