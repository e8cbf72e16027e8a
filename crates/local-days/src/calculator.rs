//! Local-calendar boundaries for a single timezone.
//!
//! A [`LocalDaysCalculator`] is bound to one timezone at construction and
//! answers calendar questions about absolute instants in terms of that
//! zone's civil calendar: where the local day or month starts, which
//! weekday it is locally, and what adding N local days means.
//!
//! Every operation follows the same path: the instant is converted to the
//! local wall clock, the calendar computation happens on the wall clock, and
//! the result is interpreted in the zone again. Because the interpretation
//! honours DST, a local day is 23 or 25 hours long on transition days.
//!
//! # DST policy
//!
//! When a computed wall clock does not exist (spring forward), the result
//! is the first instant after the gap. When it exists twice (fall back),
//! the result is the earlier instant. The `start_of_next_*` operations and
//! [`next_local_weekday`](LocalDaysCalculator::next_local_weekday) never
//! return an instant at or before their input.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use chrono_tz::Tz;

use crate::converter::LocalTimeConverter;
use crate::error::{LocalDaysError, Result};

/// IANA identifier of the German civil timezone.
pub const GERMANY_TIMEZONE: &str = "Europe/Berlin";

/// Computes local day and month boundaries for a fixed timezone.
///
/// The bound zone never changes after construction, so every method is a
/// pure function of its arguments.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use local_days::LocalDaysCalculator;
///
/// let berlin = LocalDaysCalculator::new("Europe/Berlin").unwrap();
///
/// // The local day of 2022-03-27 is only 23 hours long
/// let start = Utc.with_ymd_and_hms(2022, 3, 27, 0, 0, 0).unwrap();
/// let next = berlin.add_local_days(start, 1);
/// assert_eq!(next, Utc.with_ymd_and_hms(2022, 3, 27, 23, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct LocalDaysCalculator<Z: TimeZone = Tz> {
    converter: LocalTimeConverter<Z>,
}

impl LocalDaysCalculator<Tz> {
    /// Create a calculator for an IANA timezone identifier, e.g. `"Europe/Berlin"`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalDaysError::UnknownTimezone`] if the identifier is not
    /// part of the embedded timezone database.
    pub fn new(timezone: &str) -> Result<Self> {
        let zone = timezone.parse::<Tz>().map_err(|_| {
            tracing::warn!(timezone, "timezone could not be resolved");
            LocalDaysError::UnknownTimezone(timezone.to_string())
        })?;
        tracing::debug!(timezone = zone.name(), "resolved timezone");
        Ok(Self::with_zone(zone))
    }

    /// Calculator for German local time ([`GERMANY_TIMEZONE`]).
    pub fn germany() -> Self {
        Self::with_zone(chrono_tz::Europe::Berlin)
    }
}

impl<Z: TimeZone> LocalDaysCalculator<Z> {
    /// Create a calculator for an already resolved timezone.
    ///
    /// Works with any [`chrono::TimeZone`], e.g. a `chrono_tz` constant,
    /// [`chrono::FixedOffset`] or [`chrono::Utc`].
    pub fn with_zone(zone: Z) -> Self {
        Self {
            converter: LocalTimeConverter::new(zone),
        }
    }

    /// The timezone this calculator is bound to.
    pub fn timezone(&self) -> &Z {
        self.converter.zone()
    }

    // ── Days ────────────────────────────────────────────────────────────

    /// Add `days` local calendar days, keeping the local time of day.
    ///
    /// This adds exactly 24 hours on most days, but 23 hours across a
    /// spring-forward transition and 25 hours across a fall-back
    /// transition. `days` may be zero or negative.
    ///
    /// # Panics
    ///
    /// Panics if the result is outside the range of `DateTime<Utc>`. Use
    /// [`checked_add_local_days`](Self::checked_add_local_days) to get
    /// `None` instead.
    pub fn add_local_days(&self, instant: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        match self.checked_add_local_days(instant, days) {
            Some(result) => result,
            None => panic!("adding {days} local days to {instant} overflows the supported date range"),
        }
    }

    /// Like [`add_local_days`](Self::add_local_days), returning `None` on overflow.
    pub fn checked_add_local_days(&self, instant: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
        let days = Duration::try_days(days)?;
        self.within_range(instant, |instant| {
            let local = self.converter.to_local(instant)?;
            self.converter.to_instant(local.checked_add_signed(days)?)
        })
    }

    /// Start (local midnight) of the local day containing `instant`.
    ///
    /// The result is never after `instant`.
    ///
    /// # Panics
    ///
    /// Panics if the local day starts before the range of `DateTime<Utc>`.
    pub fn start_of_local_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.checked_start_of_local_day(instant)
            .unwrap_or_else(|| out_of_range("start of the local day", instant))
    }

    fn checked_start_of_local_day(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.within_range(instant, |instant| {
            let date = self.converter.to_local(instant)?.date();
            self.converter.to_instant(midnight(date))
        })
    }

    /// Start (local midnight) of the local day after the one containing `instant`.
    ///
    /// The result is always after `instant`, even if `instant` is itself a
    /// local midnight.
    ///
    /// # Panics
    ///
    /// Panics if the next local day starts after the range of `DateTime<Utc>`.
    pub fn start_of_next_local_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.within_range(instant, |instant| {
            let date = self.converter.to_local(instant)?.date().succ_opt()?;
            self.converter.to_instant_after(midnight(date), instant)
        })
        .unwrap_or_else(|| out_of_range("start of the next local day", instant))
    }

    // ── Months ──────────────────────────────────────────────────────────

    /// Start of the local month containing `instant`: day 1, 00:00 local.
    ///
    /// The result is never after `instant`.
    ///
    /// # Panics
    ///
    /// Panics if the local month starts before the range of `DateTime<Utc>`.
    pub fn start_of_local_month(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.within_range(instant, |instant| {
            let date = self.converter.to_local(instant)?.date().with_day(1)?;
            self.converter.to_instant(midnight(date))
        })
        .unwrap_or_else(|| out_of_range("start of the local month", instant))
    }

    /// Start of the local month after the one containing `instant`.
    ///
    /// December rolls over into January of the following year. The result is
    /// always after `instant`.
    ///
    /// # Panics
    ///
    /// Panics if the next local month starts after the range of `DateTime<Utc>`.
    pub fn start_of_next_local_month(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.within_range(instant, |instant| {
            let date = self
                .converter
                .to_local(instant)?
                .date()
                .with_day(1)?
                .checked_add_months(Months::new(1))?;
            self.converter.to_instant_after(midnight(date), instant)
        })
        .unwrap_or_else(|| out_of_range("start of the next local month", instant))
    }

    // ── Weekdays ────────────────────────────────────────────────────────

    /// Weekday of `instant` in local time. Defined for every instant.
    pub fn local_weekday(&self, instant: DateTime<Utc>) -> Weekday {
        self.converter.local_weekday(instant)
    }

    /// Start of the next local day that falls on `weekday`.
    ///
    /// The result is always after `instant` and at most seven local days
    /// later. If `instant` already falls on `weekday`, the result is the
    /// start of the same weekday one week later.
    ///
    /// # Panics
    ///
    /// Panics if that day starts after the range of `DateTime<Utc>`.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc, Weekday};
    /// use local_days::LocalDaysCalculator;
    ///
    /// let berlin = LocalDaysCalculator::germany();
    /// // Tuesday 2022-11-15, 13:00 local
    /// let tuesday = Utc.with_ymd_and_hms(2022, 11, 15, 12, 0, 0).unwrap();
    /// let next = berlin.next_local_weekday(tuesday, Weekday::Tue);
    /// assert_eq!(next, Utc.with_ymd_and_hms(2022, 11, 21, 23, 0, 0).unwrap());
    /// ```
    pub fn next_local_weekday(&self, instant: DateTime<Utc>, weekday: Weekday) -> DateTime<Utc> {
        self.within_range(instant, |instant| {
            let mut date = self.converter.to_local(instant)?.date();
            loop {
                date = date.succ_opt()?;
                if date.weekday() != weekday {
                    continue;
                }
                let start = self.converter.to_instant_after(midnight(date), instant)?;
                // A skipped local date resolves into the following day.
                if self.local_weekday(start) == weekday {
                    return Some(start);
                }
            }
        })
        .unwrap_or_else(|| out_of_range("next local weekday", instant))
    }

    // ── Predicates ──────────────────────────────────────────────────────

    /// Whether `instant` is exactly the start of its local day. Defined for
    /// every instant.
    pub fn is_local_midnight(&self, instant: DateTime<Utc>) -> bool {
        self.checked_start_of_local_day(instant) == Some(instant)
    }

    // ── Range edges ─────────────────────────────────────────────────────

    /// Run `op` on `instant`. If that fails because a wall clock leaves
    /// chrono's range, run it one Gregorian cycle closer to the epoch and
    /// shift the result back.
    ///
    /// The calendar and the weekdays repeat every 400 years. The shifted run
    /// is only trusted where the zone's offsets repeat as well, which is the
    /// case far outside the transition tables.
    fn within_range<F>(&self, instant: DateTime<Utc>, op: F) -> Option<DateTime<Utc>>
    where
        F: Fn(DateTime<Utc>) -> Option<DateTime<Utc>>,
    {
        if let Some(result) = op(instant) {
            return Some(result);
        }
        let cycle = if instant.timestamp() > 0 {
            Duration::days(GREGORIAN_CYCLE_DAYS)
        } else {
            Duration::days(-GREGORIAN_CYCLE_DAYS)
        };
        let shifted = instant.checked_sub_signed(cycle)?;
        let shifted_result = op(shifted)?;
        let result = shifted_result.checked_add_signed(cycle)?;

        let converter = &self.converter;
        let same_offsets = converter.offset_seconds(instant) == converter.offset_seconds(shifted)
            && converter.offset_seconds(result) == converter.offset_seconds(shifted_result);
        same_offsets.then_some(result)
    }
}

/// Days in 400 Gregorian years.
const GREGORIAN_CYCLE_DAYS: i64 = 146_097;

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn out_of_range(what: &str, instant: DateTime<Utc>) -> ! {
    panic!("the {what} of {instant} is outside the supported date range")
}

// ── Tests ───────────────────────────────────────────────────────────────────
