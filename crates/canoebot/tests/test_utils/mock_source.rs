//! Counting table source for command and scheduler tests.

use async_trait::async_trait;
use canoebot::{Facilities, Facility, RawTable, SrcError, SrcErrorKind, TableSource};
use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Badminton (6 courts), tennis (2 courts) and the pool (1 lane).
pub fn named_facilities() -> Facilities {
    Facilities::new(vec![
        Facility::new("Badminton Courts", "badminton", "BB", 6),
        Facility::new("Tennis Courts", "tennis", "TC", 2),
        Facility::new("Swimming Pool Lane", "pool", "SP", 1),
    ])
    .unwrap()
}

/// Serves two-hour tables with every court free, counting fetches.
#[derive(Clone, Default)]
pub struct CountingSource {
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl CountingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl TableSource for CountingSource {
    async fn fetch_table(&self, facility: &Facility, _anchor: NaiveDate) -> Result<RawTable, SrcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SrcError::new(SrcErrorKind::Timeout(10)));
        }

        let mut rows = Vec::new();
        for hour in ["0700-0800", "0800-0900"] {
            for court in 1..=*facility.courts() {
                let mut row = vec![hour.to_string(), court.to_string()];
                row.extend(std::iter::repeat_n("Avail".to_string(), 8));
                rows.push(row);
            }
        }
        Ok(RawTable::new(rows))
    }
}
