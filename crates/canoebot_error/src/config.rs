//! Errors from loading cache settings and the facility list.

/// A rejected setting, facility entry or config file.
///
/// `setting` names what was wrong (`short_ttl_secs`, `facilities`, a file
/// path) so a bad deploy points straight at the offending key.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid configuration [{}]: {} ({}:{})", setting, reason, file, line)]
pub struct ConfigError {
    /// Offending key, facility or file
    pub setting: String,
    /// What is wrong with it
    pub reason: String,
    /// Line that rejected it
    pub line: u32,
    /// Source file that rejected it
    pub file: &'static str,
}

impl ConfigError {
    /// Reject `setting` for `reason`, recording the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use canoebot_error::ConfigError;
    ///
    /// let err = ConfigError::new("short_ttl_secs", "90s exceeds long_ttl_secs (60s)");
    /// assert_eq!(err.setting, "short_ttl_secs");
    /// assert!(err.to_string().starts_with("Invalid configuration [short_ttl_secs]"));
    /// ```
    #[track_caller]
    pub fn new(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            setting: setting.into(),
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
