//! Mock booking table source for testing.

use async_trait::async_trait;
use canoebot_error::{SrcError, SrcErrorKind};
use canoebot_src::{Facilities, Facility, RawTable, TableSource};
use chrono::NaiveDate;
use std::collections::HashSet;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Build a weekly table for `courts` courts over `hours` hours.
///
/// On day `d` the first `min(d, courts)` courts are available and the rest
/// are booked by "NTU DBM", so the reduced slot text for day `d` is
/// `"d/courts"` (or the shared label on day 0).
pub fn weekly_table(courts: u8, hours: usize) -> RawTable {
    let mut rows = Vec::new();
    for hour in 0..hours {
        let label = format!("{:02}00-{:02}00", 8 + hour, 9 + hour);
        for court in 0..courts as usize {
            let mut row = vec![label.clone(), (court + 1).to_string()];
            for day in 0..8 {
                let cell = if court < day { "Avail" } else { "NTU DBM" };
                row.push(cell.to_string());
            }
            rows.push(row);
        }
    }
    RawTable::new(rows)
}

/// `count` six-court facilities named F0, F1, ...
pub fn test_facilities(count: usize) -> Facilities {
    Facilities::new(
        (0..count)
            .map(|i| Facility::new(format!("Facility {}", i), format!("f{}", i), format!("F{}", i), 6))
            .collect(),
    )
    .unwrap()
}

#[derive(Default)]
struct MockState {
    calls: Vec<(String, NaiveDate)>,
    failing: HashSet<String>,
    malformed: HashSet<String>,
}

/// Table source that records every fetch and fails on request.
///
/// Clones share state, so a test can keep one handle while the cache owns
/// another.
#[derive(Clone, Default)]
pub struct MockTableSource {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
    hours: usize,
}

impl MockTableSource {
    /// A source serving three-hour tables instantly.
    pub fn new() -> Self {
        Self {
            hours: 3,
            ..Self::default()
        }
    }

    /// Delay every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make fetches for a facility code fail (or succeed again).
    pub fn set_failing(&self, code: &str, failing: bool) {
        let mut state = self.state.lock();
        if failing {
            state.failing.insert(code.to_string());
        } else {
            state.failing.remove(code);
        }
    }

    /// Serve a table with a row missing for a facility code.
    pub fn set_malformed(&self, code: &str) {
        self.state.lock().malformed.insert(code.to_string());
    }

    /// Number of fetches started.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Fetches started for one facility code.
    pub fn calls_for(&self, code: &str) -> Vec<NaiveDate> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|(c, _)| c == code)
            .map(|(_, date)| *date)
            .collect()
    }
}

#[async_trait]
impl TableSource for MockTableSource {
    async fn fetch_table(&self, facility: &Facility, anchor: NaiveDate) -> Result<RawTable, SrcError> {
        let (failing, malformed) = {
            let mut state = self.state.lock();
            state.calls.push((facility.code_name().clone(), anchor));
            (
                state.failing.contains(facility.code_name()),
                state.malformed.contains(facility.code_name()),
            )
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if failing {
            return Err(SrcError::new(SrcErrorKind::Status(503)));
        }

        let table = weekly_table(*facility.courts(), self.hours);
        if malformed {
            let mut rows = table.rows().to_vec();
            rows.pop();
            return Ok(RawTable::new(rows));
        }
        Ok(table)
    }
}
