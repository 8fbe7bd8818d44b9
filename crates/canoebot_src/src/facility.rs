//! Bookable SRC facilities.

use canoebot_error::{CanoebotResult, ConfigError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Position of a facility in the configured list.
pub type FacilityId = usize;

/// One bookable SRC facility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Facility {
    /// Full name as listed on the SRC website
    name: String,
    /// Short form for menus
    short_name: String,
    /// Facility code used when querying SRC
    code_name: String,
    /// Courts (slots) per hour, also part of the query
    courts: u8,
}

impl Facility {
    /// Create a facility record.
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        code_name: impl Into<String>,
        courts: u8,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            code_name: code_name.into(),
            courts,
        }
    }
}

/// Ordered, validated list of facilities. Fixed for the life of the process.
///
/// # Example
///
/// ```
/// use canoebot_src::{Facilities, Facility};
///
/// let facilities = Facilities::new(vec![
///     Facility::new("Wave Gym", "wavegym", "WG", 20),
///     Facility::new("Badminton Courts", "badminton", "BB", 6),
/// ])
/// .unwrap();
///
/// assert_eq!(facilities.find("bb"), Some(1));
/// assert_eq!(facilities.shortform_list(), vec!["wavegym", "badminton"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facilities {
    inner: Vec<Facility>,
}

impl Facilities {
    /// Validate and wrap a facility list.
    ///
    /// The list must be non-empty, every facility needs at least one court,
    /// and code names must be unique (case-insensitive).
    pub fn new(facilities: Vec<Facility>) -> CanoebotResult<Self> {
        if facilities.is_empty() {
            return Err(ConfigError::new("facilities", "facility list is empty").into());
        }

        let mut codes = HashSet::new();
        for facility in &facilities {
            if facility.courts == 0 {
                return Err(ConfigError::new(
                    format!("facilities.{}.courts", facility.code_name),
                    format!("facility '{}' must have at least one court", facility.name),
                )
                .into());
            }
            if facility.code_name.trim().is_empty() {
                return Err(ConfigError::new(
                    format!("facilities.{}.code_name", facility.short_name),
                    format!("facility '{}' has an empty code name", facility.name),
                )
                .into());
            }
            if !codes.insert(facility.code_name.to_lowercase()) {
                return Err(ConfigError::new(
                    "facilities",
                    format!("duplicate facility code '{}'", facility.code_name),
                )
                .into());
            }
        }

        Ok(Self { inner: facilities })
    }

    /// Facility by id.
    pub fn get(&self, id: FacilityId) -> Option<&Facility> {
        self.inner.get(id)
    }

    /// Number of facilities.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Always false for a validated list.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate facilities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Facility> {
        self.inner.iter()
    }

    /// Resolve user input to a facility id.
    ///
    /// Accepts the 1-based number from [`Facilities::show_table`], a code
    /// name, a short name or a full name, ignoring case.
    pub fn find(&self, query: &str) -> Option<FacilityId> {
        let query = query.trim();
        if let Ok(number) = query.parse::<usize>() {
            return (1..=self.inner.len()).contains(&number).then(|| number - 1);
        }

        self.inner.iter().position(|f| {
            f.code_name.eq_ignore_ascii_case(query)
                || f.short_name.eq_ignore_ascii_case(query)
                || f.name.eq_ignore_ascii_case(query)
        })
    }

    /// Short names in id order, for building selection menus.
    pub fn shortform_list(&self) -> Vec<String> {
        self.inner.iter().map(|f| f.short_name.clone()).collect()
    }

    /// Numbered facility listing.
    pub fn show_table(&self) -> String {
        let number_width = self.inner.len().to_string().len().max(2);
        let mut table = format!("{:>number_width$}  facility\n", "no");
        for (idx, facility) in self.inner.iter().enumerate() {
            table.push_str(&format!("{:>number_width$}  {}\n", idx + 1, facility.name));
        }
        table
    }
}
