//! Two-way set-associative cache of weekly booking tables.
//!
//! Every facility owns a set of two lines ("ways"). A populated line holds
//! the 8-day table starting at its anchor date. Lookups resolve a date to a
//! line, fetching into the stale (or empty) way on a miss, and mark that line
//! fresh and its partner stale. One mutex guards all sets; it is only held
//! while reading or committing line state, never while a table is fetched.

use crate::{
    CacheConfig, DAYS_PER_TABLE, Facilities, Facility, FacilityId, HourlySlot, RawTable,
    TableSource, format_day, render_slots,
};
use canoebot_error::{CanoebotResult, SrcError, SrcErrorKind};
use chrono::{DateTime, Days, Local, NaiveDate};
use derive_getters::Getters;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

const WINDOW_DAYS: u64 = DAYS_PER_TABLE as u64;

/// One of the two lines of a facility's set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Way {
    /// First line; filled by the startup prefill
    #[display("0")]
    Zero,
    /// Second line
    #[display("1")]
    One,
}

impl Way {
    /// Both ways, in index order.
    pub const ALL: [Way; 2] = [Way::Zero, Way::One];

    /// Index into a set.
    pub fn index(self) -> usize {
        match self {
            Way::Zero => 0,
            Way::One => 1,
        }
    }

    /// The partner line.
    pub fn other(self) -> Way {
        match self {
            Way::Zero => Way::One,
            Way::One => Way::Zero,
        }
    }

    /// Way from an index, if in range.
    pub fn from_index(idx: usize) -> Option<Way> {
        match idx {
            0 => Some(Way::Zero),
            1 => Some(Way::One),
            _ => None,
        }
    }
}

/// A populated cache line.
#[derive(Debug, Clone, Getters)]
pub struct CacheLine {
    /// First of the 8 days the table covers
    anchor_date: NaiveDate,
    /// When the table was fetched
    fetch_time: DateTime<Local>,
    /// How long the fetch took
    latency: Duration,
    /// Set when the partner line was used more recently
    is_stale: bool,
    /// The table as fetched
    raw_table: Arc<RawTable>,
}

impl CacheLine {
    /// Last day the table covers.
    pub fn last_date(&self) -> NaiveDate {
        self.anchor_date
            .checked_add_days(Days::new(WINDOW_DAYS - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Whether `date` falls in this line's window.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.anchor_date <= date && date <= self.last_date()
    }

    /// Day column of `date` within the table.
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        self.covers(date)
            .then(|| (date - self.anchor_date).num_days() as usize)
    }

    /// Time since the table was fetched.
    pub fn age(&self) -> Duration {
        (Local::now() - self.fetch_time)
            .to_std()
            .unwrap_or_default()
    }

    fn has_reached(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

/// A failed worker of a bulk refresh.
#[derive(Debug, Clone, Getters)]
pub struct RefreshFailure {
    /// Facility of the line
    facility: FacilityId,
    /// Way of the line
    way: Way,
    /// Anchor that was being fetched
    anchor: NaiveDate,
    /// What went wrong
    error: SrcError,
}

/// Outcome of a bulk refresh or prefill.
#[derive(Debug, Clone, Default, Getters)]
pub struct RefreshReport {
    /// Workers spawned
    attempted: usize,
    /// Lines committed
    refreshed: usize,
    /// Fetched tables discarded because the line was replaced meanwhile
    skipped: usize,
    /// Workers that failed
    failures: Vec<RefreshFailure>,
}

impl RefreshReport {
    /// True when no worker failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

type CacheSet = [Option<CacheLine>; 2];

enum Resolution {
    Hit {
        way: Way,
        line: CacheLine,
        expired: bool,
    },
    Miss {
        way: Way,
        anchor: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy)]
enum Job {
    /// Re-fetch in place, keeping the line's recency
    Refresh,
    /// Overwrite the way and make it the fresh line
    Install,
}

struct Shared<S> {
    facilities: Facilities,
    source: S,
    config: CacheConfig,
    sets: Mutex<Vec<CacheSet>>,
}

/// Booking cache shared by every request handler.
///
/// Cloning is cheap and yields a handle to the same cache.
///
/// # Example
///
/// ```no_run
/// use canoebot_src::{BookingCache, SrcConfig, SrcWebsite};
///
/// # async fn run() -> canoebot_error::CanoebotResult<()> {
/// let config = SrcConfig::load()?;
/// let cache = BookingCache::new(
///     config.facilities()?,
///     SrcWebsite::new(config.cache())?,
///     config.cache().clone(),
/// );
///
/// cache.prefill_today_for_all_facilities().await;
/// let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// println!("{}", cache.get_result(date, 0).await?);
/// # Ok(())
/// # }
/// ```
pub struct BookingCache<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for BookingCache<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: TableSource + 'static> BookingCache<S> {
    /// Create a cache with every line empty.
    pub fn new(facilities: Facilities, source: S, config: CacheConfig) -> Self {
        debug!(
            facilities = facilities.len(),
            long_ttl_secs = config.long_ttl_secs(),
            short_ttl_secs = config.short_ttl_secs(),
            "Creating booking cache"
        );
        let sets = (0..facilities.len()).map(|_| [None, None]).collect();
        Self {
            shared: Arc::new(Shared {
                facilities,
                source,
                config,
                sets: Mutex::new(sets),
            }),
        }
    }

    /// Facilities served by this cache.
    pub fn facilities(&self) -> &Facilities {
        &self.shared.facilities
    }

    /// Cache settings.
    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    /// Formatted availability of a facility on a date.
    ///
    /// Fetches on a miss or when the covering line has outlived the long TTL.
    /// A failed first fetch is an error; a failed re-fetch falls back to the
    /// data already held.
    #[instrument(skip(self))]
    pub async fn get_result(&self, date: NaiveDate, facility: FacilityId) -> CanoebotResult<String> {
        let info = self.facility(facility)?;
        let line = self.resolve(facility, info, date).await?;
        let offset = line.offset_of(date).ok_or_else(|| {
            SrcError::new(SrcErrorKind::Format(format!(
                "line anchored {} does not cover {}",
                line.anchor_date, date
            )))
        })?;

        let slots = format_day(&line.raw_table, *info.courts(), offset)?;
        Ok(render_result(date, info, &line, &slots))
    }

    /// Hour labels of a facility, taken from the line covering today.
    #[instrument(skip(self))]
    pub async fn get_time_slots(&self, facility: FacilityId) -> CanoebotResult<Vec<String>> {
        let info = self.facility(facility)?;
        let today = Local::now().date_naive();
        let line = self.resolve(facility, info, today).await?;
        Ok(line.raw_table.hour_labels(*info.courts())?)
    }

    /// Re-fetch one line if it is at least the short TTL old.
    ///
    /// Returns whether new data was committed. Empty and young lines are left
    /// alone, which absorbs bursts of refresh presses.
    #[instrument(skip(self))]
    pub async fn refresh_single(&self, facility: FacilityId, way: Way) -> CanoebotResult<bool> {
        let info = self.facility(facility)?;
        let short_ttl = self.shared.config.short_ttl();

        let anchor = {
            let sets = self.shared.sets.lock();
            match &sets[facility][way.index()] {
                Some(line) if line.has_reached(short_ttl) => line.anchor_date,
                Some(_) => {
                    debug!("Line younger than short TTL, skipping refresh");
                    return Ok(false);
                }
                None => return Ok(false),
            }
        };

        let fresh = self.fetch_line(info, anchor).await?;
        Ok(self.commit_refresh(facility, way, fresh).is_some())
    }

    /// Refresh whichever line covers `date`, see [`BookingCache::refresh_single`].
    pub async fn refresh_date(&self, date: NaiveDate, facility: FacilityId) -> CanoebotResult<bool> {
        match self.way_for(date, facility) {
            Some(way) => self.refresh_single(facility, way).await,
            None => Ok(false),
        }
    }

    /// Concurrently re-fetch every populated line at least the long TTL old.
    ///
    /// One task per line; all are joined before returning. Failed lines keep
    /// their previous data and are listed in the report.
    #[instrument(skip(self))]
    pub async fn refresh_all_populated(&self) -> RefreshReport {
        let long_ttl = self.shared.config.long_ttl();
        let targets: Vec<(FacilityId, Way, NaiveDate)> = {
            let sets = self.shared.sets.lock();
            sets.iter()
                .enumerate()
                .flat_map(|(facility, set)| {
                    Way::ALL.into_iter().filter_map(move |way| {
                        set[way.index()]
                            .as_ref()
                            .filter(|line| line.has_reached(long_ttl))
                            .map(|line| (facility, way, line.anchor_date))
                    })
                })
                .collect()
        };

        self.run_workers(targets, Job::Refresh).await
    }

    /// Make way 0 of every facility cover today.
    pub async fn prefill_today_for_all_facilities(&self) -> RefreshReport {
        self.prefill(Local::now().date_naive()).await
    }

    /// Make way 0 of every facility cover `date`, fetching where it does not.
    #[instrument(skip(self))]
    pub async fn prefill(&self, date: NaiveDate) -> RefreshReport {
        let targets: Vec<(FacilityId, Way, NaiveDate)> = {
            let sets = self.shared.sets.lock();
            sets.iter()
                .enumerate()
                .filter(|(_, set)| {
                    !set[Way::Zero.index()]
                        .as_ref()
                        .is_some_and(|line| line.covers(date))
                })
                .map(|(facility, _)| (facility, Way::Zero, date))
                .collect()
        };

        self.run_workers(targets, Job::Install).await
    }

    /// Way whose window covers `date`, preferring the fresh line.
    pub fn way_for(&self, date: NaiveDate, facility: FacilityId) -> Option<Way> {
        let sets = self.shared.sets.lock();
        sets.get(facility).and_then(|set| covering_way(set, date))
    }

    /// Snapshot of one line, `None` while empty.
    pub fn line(&self, facility: FacilityId, way: Way) -> Option<CacheLine> {
        let sets = self.shared.sets.lock();
        sets.get(facility).and_then(|set| set[way.index()].clone())
    }

    /// Human-readable dump of every line.
    pub fn status_table(&self) -> String {
        let sets = self.shared.sets.lock();
        let mut table = String::new();
        for (facility, set) in self.shared.facilities.iter().zip(sets.iter()) {
            for way in Way::ALL {
                let state = match &set[way.index()] {
                    Some(line) => format!(
                        "{} .. {}  fetched {}  {}",
                        line.anchor_date,
                        line.last_date(),
                        line.fetch_time.format("%H:%M:%S"),
                        if line.is_stale { "stale" } else { "fresh" }
                    ),
                    None => "empty".to_string(),
                };
                table.push_str(&format!("{:<12} {}  {}\n", facility.short_name(), way, state));
            }
        }
        table
    }

    fn facility(&self, facility: FacilityId) -> Result<&Facility, SrcError> {
        self.shared
            .facilities
            .get(facility)
            .ok_or_else(|| SrcError::new(SrcErrorKind::UnknownFacility(facility)))
    }

    async fn resolve(
        &self,
        facility: FacilityId,
        info: &Facility,
        date: NaiveDate,
    ) -> Result<CacheLine, SrcError> {
        let resolution = {
            let mut sets = self.shared.sets.lock();
            plan(&mut sets[facility], date, self.shared.config.long_ttl())
        };

        match resolution {
            Resolution::Hit {
                line,
                expired: false,
                ..
            } => {
                debug!(anchor = %line.anchor_date, "Cache hit");
                Ok(line)
            }
            Resolution::Hit {
                way,
                line,
                expired: true,
            } => {
                debug!(%way, anchor = %line.anchor_date, "Cache hit past long TTL, refreshing");
                match self.fetch_line(info, line.anchor_date).await {
                    Ok(fresh) => Ok(self.commit_refresh(facility, way, fresh).unwrap_or(line)),
                    Err(error) => {
                        warn!(%way, anchor = %line.anchor_date, %error, "Refresh failed, serving previous data");
                        Ok(line)
                    }
                }
            }
            Resolution::Miss { way, anchor } => {
                info!(%way, %anchor, "Cache miss, populating line");
                let fresh = self.fetch_line(info, anchor).await.inspect_err(|error| {
                    error!(%way, %anchor, %error, "Failed to populate line");
                })?;
                Ok(self.install(facility, way, fresh))
            }
        }
    }

    async fn fetch_line(&self, info: &Facility, anchor: NaiveDate) -> Result<CacheLine, SrcError> {
        let timeout = self.shared.config.fetch_timeout();
        let started = Instant::now();

        let table = tokio::time::timeout(timeout, self.shared.source.fetch_table(info, anchor))
            .await
            .map_err(|_| SrcError::new(SrcErrorKind::Timeout(timeout.as_secs())))??;
        let latency = started.elapsed();

        // never keep a table the formatter cannot read
        table.validate(*info.courts())?;

        debug!(
            facility = %info.code_name(),
            %anchor,
            latency_ms = latency.as_millis() as u64,
            "Fetched booking table"
        );

        Ok(CacheLine {
            anchor_date: anchor,
            fetch_time: Local::now(),
            latency,
            is_stale: false,
            raw_table: Arc::new(table),
        })
    }

    /// Overwrite a way with a new line and mark it fresh.
    fn install(&self, facility: FacilityId, way: Way, line: CacheLine) -> CacheLine {
        let mut sets = self.shared.sets.lock();
        let set = &mut sets[facility];
        set[way.index()] = Some(line.clone());
        select(set, way);
        CacheLine {
            is_stale: false,
            ..line
        }
    }

    /// Swap in re-fetched data if the way still holds the same anchor.
    fn commit_refresh(&self, facility: FacilityId, way: Way, mut line: CacheLine) -> Option<CacheLine> {
        let mut sets = self.shared.sets.lock();
        let slot = &mut sets[facility][way.index()];
        match slot {
            Some(current) if current.anchor_date == line.anchor_date => {
                line.is_stale = current.is_stale;
                *current = line.clone();
                Some(line)
            }
            _ => {
                debug!(%way, anchor = %line.anchor_date, "Line replaced during refresh, discarding");
                None
            }
        }
    }

    async fn run_workers(&self, targets: Vec<(FacilityId, Way, NaiveDate)>, job: Job) -> RefreshReport {
        let handles: Vec<_> = targets
            .iter()
            .map(|&(facility, way, anchor)| {
                let cache = self.clone();
                tokio::spawn(async move { cache.refill(facility, way, anchor, job).await })
            })
            .collect();

        let results = futures::future::join_all(handles).await;

        let mut report = RefreshReport {
            attempted: targets.len(),
            ..RefreshReport::default()
        };
        for ((facility, way, anchor), result) in targets.into_iter().zip(results) {
            let error = match result {
                Ok(Ok(true)) => {
                    report.refreshed += 1;
                    continue;
                }
                Ok(Ok(false)) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(Err(error)) => error,
                Err(join_error) => SrcError::new(SrcErrorKind::Join(join_error.to_string())),
            };
            warn!(facility, %way, %anchor, %error, ?job, "Background fetch failed");
            report.failures.push(RefreshFailure {
                facility,
                way,
                anchor,
                error,
            });
        }

        info!(
            ?job,
            attempted = report.attempted,
            refreshed = report.refreshed,
            skipped = report.skipped,
            failed = report.failures.len(),
            "Bulk fetch finished"
        );
        report
    }

    async fn refill(&self, facility: FacilityId, way: Way, anchor: NaiveDate, job: Job) -> Result<bool, SrcError> {
        let info = self.facility(facility)?;
        let fresh = self.fetch_line(info, anchor).await?;
        Ok(match job {
            Job::Refresh => self.commit_refresh(facility, way, fresh).is_some(),
            Job::Install => {
                self.install(facility, way, fresh);
                true
            }
        })
    }
}

/// Decide how to serve `date` from one set. Marks the covering line fresh
/// on a hit; on a miss picks the way to replace and its anchor.
fn plan(set: &mut CacheSet, date: NaiveDate, long_ttl: Duration) -> Resolution {
    if let Some(way) = covering_way(set, date) {
        select(set, way);
        if let Some(line) = &set[way.index()] {
            return Resolution::Hit {
                way,
                line: line.clone(),
                expired: line.has_reached(long_ttl),
            };
        }
    }

    if set.iter().all(Option::is_none) {
        return Resolution::Miss {
            way: Way::Zero,
            anchor: date,
        };
    }

    // both populated and neither stale only happens mid-race; evict way 0
    let way = Way::ALL
        .into_iter()
        .find(|way| set[way.index()].as_ref().is_none_or(|line| line.is_stale))
        .unwrap_or(Way::Zero);

    let anchor = match &set[way.other().index()] {
        Some(other) => bridge_anchor(other, date),
        None => date,
    };

    Resolution::Miss { way, anchor }
}

fn covering_way(set: &CacheSet, date: NaiveDate) -> Option<Way> {
    Way::ALL
        .into_iter()
        .filter_map(|way| {
            set[way.index()]
                .as_ref()
                .filter(|line| line.covers(date))
                .map(|line| (way, line.is_stale))
        })
        .min_by_key(|(_, is_stale)| *is_stale)
        .map(|(way, _)| way)
}

/// Anchor for a new line so it sits flush against `other` when `date` is
/// within one window of it.
fn bridge_anchor(other: &CacheLine, date: NaiveDate) -> NaiveDate {
    let first = other.anchor_date;
    let last = other.last_date();
    let window = WINDOW_DAYS as i64;

    if date > last && (date - last).num_days() <= window {
        last.succ_opt().unwrap_or(date)
    } else if date < first && (first - date).num_days() <= window {
        first.checked_sub_days(Days::new(WINDOW_DAYS)).unwrap_or(date)
    } else {
        date
    }
}

fn select(set: &mut CacheSet, way: Way) {
    if let Some(line) = &mut set[way.index()] {
        line.is_stale = false;
    }
    if let Some(line) = &mut set[way.other().index()] {
        line.is_stale = true;
    }
}

fn render_result(date: NaiveDate, facility: &Facility, line: &CacheLine, slots: &[HourlySlot]) -> String {
    format!(
        "{}\n{}\n\n{}\nlast updated: {}\nfetch time: {:.4}s",
        date.format("%d %b %y, %A"),
        facility.name(),
        render_slots(slots),
        line.fetch_time.format("%H:%M"),
        line.latency.as_secs_f64()
    )
}
