//! Wall-clock access and timestamp-derived identifiers.
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of the current instant and the player's local calendar date.
///
/// Injected into the session so daily rollover can be driven deterministically.
pub trait Clock {
    /// Current instant, used for creation timestamps and instance ids.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the player's local timezone.
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a fixed instant and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
}

impl FixedClock {
    #[must_use]
    pub const fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }

    /// Fixed clock for `today` whose instant is midnight UTC of that date.
    #[must_use]
    pub fn on(today: NaiveDate) -> Self {
        let now = today.and_time(chrono::NaiveTime::MIN).and_utc();
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

/// Hands out unique ids derived from creation timestamps.
///
/// Two ids minted in the same millisecond are bumped apart so every id is
/// strictly greater than the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdMint {
    last: u64,
}

impl IdMint {
    /// Mint seeded so every future id exceeds all of `existing`.
    #[must_use]
    pub fn seeded(existing: impl IntoIterator<Item = u64>) -> Self {
        Self {
            last: existing.into_iter().max().unwrap_or(0),
        }
    }

    /// Next id at or after `now_ms`.
    pub fn next(&mut self, now_ms: u64) -> u64 {
        let id = now_ms.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}
