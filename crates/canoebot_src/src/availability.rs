//! Booking table shape and hourly availability reduction.

use canoebot_error::{SrcError, SrcErrorKind};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Days covered by one booking table.
pub const DAYS_PER_TABLE: usize = 8;

/// Column of the first day in a normalised row (`[hour, court, day0..day7]`).
pub const FIRST_DAY_COLUMN: usize = 2;

pub(crate) const ROW_WIDTH: usize = FIRST_DAY_COLUMN + DAYS_PER_TABLE;

/// Booking status of one court in one time slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotAvailability {
    /// Available to book
    Available,
    /// Made unavailable by SRC
    Closed,
    /// Booked; holds whatever the page shows (a name, matric no. or group)
    Booked(String),
}

impl From<&str> for SlotAvailability {
    fn from(cell: &str) -> Self {
        let cell = cell.trim();
        match cell.to_lowercase().as_str() {
            "avail" => Self::Available,
            "closed" => Self::Closed,
            _ => Self::Booked(cell.to_owned()),
        }
    }
}

impl FromStr for SlotAvailability {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for SlotAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "Avail"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Booked(who) => write!(f, "{}", who),
        }
    }
}

/// One weekly booking table, unprocessed.
///
/// Each row is normalised to `[hour, court, day0, .., day7]`; a facility with
/// `n` courts has `n` consecutive rows per hour.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Wrap normalised rows.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Normalised rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows (hours × courts).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check the table can be grouped into blocks of `courts` rows.
    pub fn validate(&self, courts: u8) -> Result<(), SrcError> {
        if courts == 0 {
            return Err(SrcError::new(SrcErrorKind::Format(
                "facility has no courts".to_string(),
            )));
        }
        if self.rows.is_empty() {
            return Err(SrcError::new(SrcErrorKind::Format(
                "table has no rows".to_string(),
            )));
        }
        if let Some(idx) = self.rows.iter().position(|row| row.len() != ROW_WIDTH) {
            return Err(SrcError::new(SrcErrorKind::Format(format!(
                "row {} has {} columns, expected {}",
                idx,
                self.rows[idx].len(),
                ROW_WIDTH
            ))));
        }
        if self.rows.len() % courts as usize != 0 {
            return Err(SrcError::new(SrcErrorKind::Format(format!(
                "{} rows is not a multiple of {} courts",
                self.rows.len(),
                courts
            ))));
        }
        Ok(())
    }

    /// Hour labels, one per block of `courts` rows.
    pub fn hour_labels(&self, courts: u8) -> Result<Vec<String>, SrcError> {
        self.validate(courts)?;
        Ok(self
            .rows
            .chunks(courts as usize)
            .map(|block| block[0][0].clone())
            .collect())
    }
}

/// Availability of one hour, squashed across all courts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HourlySlot {
    /// Time slot label
    pub time: String,
    /// Courts in the slot
    pub total: u8,
    /// Courts available
    pub available: u8,
    /// Set when every court holds the same non-available value
    pub label: Option<String>,
}

impl HourlySlot {
    /// `"{available}/{total}"`, or the shared label.
    pub fn slots_text(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{}/{}", self.available, self.total),
        }
    }
}

/// Reduce one day column of a table to hourly availability.
///
/// `offset` picks the day (`0..8`). Blocks of `courts` rows become a count of
/// available courts, or the shared label when nothing is free and all courts
/// agree. Single-court facilities always report `0/1` so individual bookers
/// are never exposed.
///
/// # Example
///
/// ```
/// use canoebot_src::{RawTable, format_day};
///
/// let row = |hour: &str, court: &str, cell: &str| {
///     let mut row = vec![hour.to_string(), court.to_string()];
///     row.extend(std::iter::repeat(cell.to_string()).take(8));
///     row
/// };
/// let table = RawTable::new(vec![
///     row("0800-0900", "1", "Avail"),
///     row("0800-0900", "2", "AVAIL"),
///     row("0900-1000", "1", "NTU DBM"),
///     row("0900-1000", "2", "NTU DBM"),
/// ]);
///
/// let slots = format_day(&table, 2, 0).unwrap();
/// assert_eq!(slots[0].slots_text(), "2/2");
/// assert_eq!(slots[1].slots_text(), "NTU DBM");
/// ```
pub fn format_day(table: &RawTable, courts: u8, offset: usize) -> Result<Vec<HourlySlot>, SrcError> {
    if offset >= DAYS_PER_TABLE {
        return Err(SrcError::new(SrcErrorKind::Format(format!(
            "day offset {} outside the {}-day table",
            offset, DAYS_PER_TABLE
        ))));
    }
    table.validate(courts)?;

    let column = FIRST_DAY_COLUMN + offset;
    let slots = table
        .rows
        .chunks(courts as usize)
        .map(|block| {
            let cells: Vec<SlotAvailability> = block
                .iter()
                .map(|row| SlotAvailability::from(row[column].as_str()))
                .collect();
            squash(block[0][0].clone(), courts, &cells)
        })
        .collect();

    Ok(slots)
}

fn squash(time: String, courts: u8, cells: &[SlotAvailability]) -> HourlySlot {
    let mut slot = HourlySlot {
        time,
        total: courts,
        available: 0,
        label: None,
    };

    // privacy: a lone court would identify its booker
    if courts == 1 {
        return slot;
    }

    let available = cells
        .iter()
        .filter(|cell| **cell == SlotAvailability::Available)
        .count();
    slot.available = available as u8;

    if available == 0
        && let Some(first) = cells.first()
        && cells.iter().all(|cell| cell == first)
    {
        slot.label = Some(first.to_string());
    }

    slot
}

/// Render slots as an aligned two-column table with a `time`/`slots` header.
pub fn render_slots(slots: &[HourlySlot]) -> String {
    let rows: Vec<(String, String)> = slots
        .iter()
        .map(|slot| (slot.time.clone(), slot.slots_text()))
        .collect();

    let time_width = rows
        .iter()
        .map(|(time, _)| time.chars().count())
        .chain(std::iter::once("time".len()))
        .max()
        .unwrap_or_default();
    let slots_width = rows
        .iter()
        .map(|(_, avail)| avail.chars().count())
        .chain(std::iter::once("slots".len()))
        .max()
        .unwrap_or_default();

    let mut rendered = format!(
        "{:<time_width$}  {:>slots_width$}\n",
        "time", "slots"
    );
    for (time, avail) in &rows {
        rendered.push_str(&format!("{:<time_width$}  {:>slots_width$}\n", time, avail));
    }
    rendered
}
