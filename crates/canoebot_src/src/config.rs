//! Configuration for the booking cache and facility list.
//!
//! Configuration is layered with the `config` crate:
//! - Bundled defaults (include_str! from canoebot.toml)
//! - User overrides (~/.config/canoebot/canoebot.toml, then ./canoebot.toml)
//!
//! Later sources take precedence.

use crate::{Facilities, Facility};
use canoebot_error::{CanoebotError, CanoebotResult, ConfigError};
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../canoebot.toml");

/// Cache timing and booking site settings.
///
/// # Example
///
/// ```
/// use canoebot_src::CacheConfigBuilder;
///
/// let config = CacheConfigBuilder::default()
///     .long_ttl_secs(300u64)
///     .build()
///     .unwrap();
/// assert_eq!(*config.long_ttl_secs(), 300);
/// assert_eq!(*config.short_ttl_secs(), 60);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct CacheConfig {
    /// Age (seconds) after which a line is re-fetched on lookup or by the
    /// scheduled refresh
    #[serde(default = "default_long_ttl")]
    long_ttl_secs: u64,

    /// Age (seconds) below which an interactive refresh is ignored
    #[serde(default = "default_short_ttl")]
    short_ttl_secs: u64,

    /// Interval (seconds) between scheduled refreshes
    #[serde(default = "default_refresh_interval")]
    refresh_interval_secs: u64,

    /// Upper bound (seconds) on a single table fetch
    #[serde(default = "default_fetch_timeout")]
    fetch_timeout_secs: u64,

    /// Booking page URL with `{code}`, `{courts}` and `{date}` placeholders
    #[serde(default = "default_url_template")]
    #[builder(setter(into))]
    url_template: String,

    /// Public booking page shown to users
    #[serde(default = "default_booking_link")]
    #[builder(setter(into))]
    booking_link: String,
}

fn default_long_ttl() -> u64 {
    600 // 10 minutes
}

fn default_short_ttl() -> u64 {
    60
}

fn default_refresh_interval() -> u64 {
    600
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_url_template() -> String {
    "https://wis.ntu.edu.sg/pls/webexe88/srce_smain_s.srce$sel31_v?choice=1&fcode={code}&fcourt={courts}&ftype=2&p_date={date}&p_mode=2".to_string()
}

fn default_booking_link() -> String {
    "https://wis.ntu.edu.sg/pls/webexe88/srce_smain_s.smain".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            long_ttl_secs: default_long_ttl(),
            short_ttl_secs: default_short_ttl(),
            refresh_interval_secs: default_refresh_interval(),
            fetch_timeout_secs: default_fetch_timeout(),
            url_template: default_url_template(),
            booking_link: default_booking_link(),
        }
    }
}

impl CacheConfig {
    /// Long TTL as a duration.
    pub fn long_ttl(&self) -> Duration {
        Duration::from_secs(self.long_ttl_secs)
    }

    /// Short TTL as a duration.
    pub fn short_ttl(&self) -> Duration {
        Duration::from_secs(self.short_ttl_secs)
    }

    /// Scheduled refresh interval as a duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Fetch timeout as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    fn validate(&self) -> CanoebotResult<()> {
        if self.short_ttl_secs > self.long_ttl_secs {
            return Err(ConfigError::new(
                "short_ttl_secs",
                format!(
                    "{}s must not exceed long_ttl_secs ({}s)",
                    self.short_ttl_secs, self.long_ttl_secs
                ),
            )
            .into());
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::new("fetch_timeout_secs", "must be at least 1").into());
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::new("refresh_interval_secs", "must be at least 1").into());
        }
        Ok(())
    }
}

/// Top-level SRC configuration: cache settings and the facility list.
///
/// # Example
///
/// ```no_run
/// use canoebot_src::SrcConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SrcConfig::load()?;
/// let facilities = config.facilities()?;
/// println!("{}", facilities.show_table());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SrcConfig {
    /// Cache timing and booking site settings
    #[serde(default)]
    cache: CacheConfig,

    /// Facilities in display order; a facility's position is its id
    #[serde(default)]
    facilities: Vec<Facility>,
}

impl SrcConfig {
    /// Load configuration with precedence (highest to lowest):
    /// 1. ./canoebot.toml
    /// 2. ~/.config/canoebot/canoebot.toml
    /// 3. Bundled defaults
    ///
    /// User config files are optional and skipped if not found.
    #[instrument]
    pub fn load() -> CanoebotResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/canoebot/canoebot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("canoebot").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                CanoebotError::from(ConfigError::new(
                    "canoebot.toml",
                    format!("Failed to build configuration: {}", e),
                ))
            })?
            .try_deserialize()
            .map_err(|e| {
                CanoebotError::from(ConfigError::new(
                    "canoebot.toml",
                    format!("Failed to parse configuration: {}", e),
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML file, without layering.
    pub fn from_file(path: impl AsRef<Path>) -> CanoebotResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CanoebotError::from(ConfigError::new(
                path.as_ref().display().to_string(),
                format!("Failed to read config file: {}", e),
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CanoebotResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            CanoebotError::from(ConfigError::new("toml", format!("Failed to parse config: {}", e)))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Cache settings.
    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    /// Validated facility table.
    pub fn facilities(&self) -> CanoebotResult<Facilities> {
        Facilities::new(self.facilities.clone())
    }

    fn validate(&self) -> CanoebotResult<()> {
        self.cache.validate()?;
        // Facility validation lives with the facility table
        Facilities::new(self.facilities.clone()).map(|_| ())
    }
}
