//! Conversion between absolute instants and local wall-clock time.
//!
//! The forward direction (instant → wall clock) is always unique. The
//! inverse is not: a wall-clock value can fall into a DST gap (it never
//! happens) or a DST overlap (it happens twice). [`LocalTimeConverter`]
//! resolves both cases with a single fixed policy:
//!
//! - ambiguous wall clock → the **earliest** instant (pre-transition offset)
//! - non-existent wall clock → the **first valid instant after the gap**,
//!   i.e. the transition instant itself

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
    Weekday,
};

const SECONDS_PER_DAY: i64 = 86_400;

/// Wraps a resolved timezone and converts instants to and from its local
/// wall clock.
#[derive(Debug, Clone)]
pub(crate) struct LocalTimeConverter<Z: TimeZone> {
    zone: Z,
}

impl<Z: TimeZone> LocalTimeConverter<Z> {
    pub(crate) fn new(zone: Z) -> Self {
        Self { zone }
    }

    pub(crate) fn zone(&self) -> &Z {
        &self.zone
    }

    /// Local wall clock at `instant`, or `None` if the zone offset pushes it
    /// past the range of `NaiveDateTime`. The instant itself is not changed.
    pub(crate) fn to_local(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        let utc = instant.naive_utc();
        utc.checked_add_signed(Duration::seconds(self.offset_seconds_at(&utc)))
    }

    /// Local weekday at `instant`. Defined for every instant, including those
    /// whose wall clock [`to_local`](Self::to_local) cannot represent.
    pub(crate) fn local_weekday(&self, instant: DateTime<Utc>) -> Weekday {
        let utc = instant.naive_utc();
        let seconds = i64::from(utc.num_seconds_from_midnight()) + self.offset_seconds_at(&utc);
        // Offsets stay below a day, so the local date is at most one day away.
        match seconds.div_euclid(SECONDS_PER_DAY) {
            -1 => utc.weekday().pred(),
            0 => utc.weekday(),
            _ => utc.weekday().succ(),
        }
    }

    /// Interpret `local` in the bound zone. `None` if the resulting instant
    /// is outside the range of `DateTime<Utc>`.
    pub(crate) fn to_instant(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.zone.offset_from_local_datetime(&local) {
            LocalResult::Single(offset) => self.shift_to_utc(local, &offset),
            LocalResult::Ambiguous(first, second) => {
                tracing::trace!(%local, "ambiguous local time, using earliest occurrence");
                let first = self.shift_to_utc(local, &first);
                let second = self.shift_to_utc(local, &second);
                first.into_iter().chain(second).min()
            }
            LocalResult::None => {
                tracing::trace!(%local, "non-existent local time, rolling forward past the gap");
                self.end_of_gap(local)
            }
        }
    }

    /// Interpret `local` like [`to_instant`](Self::to_instant), but never
    /// return an instant at or before `floor` when a later occurrence of the
    /// same wall clock exists.
    pub(crate) fn to_instant_after(
        &self,
        local: NaiveDateTime,
        floor: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let resolved = self.to_instant(local)?;
        if resolved > floor {
            return Some(resolved);
        }
        match self.zone.offset_from_local_datetime(&local) {
            LocalResult::Ambiguous(first, second) => {
                let first = self.shift_to_utc(local, &first);
                let second = self.shift_to_utc(local, &second);
                first.into_iter().chain(second).chain(Some(resolved)).max()
            }
            _ => Some(resolved),
        }
    }

    fn shift_to_utc(&self, local: NaiveDateTime, offset: &Z::Offset) -> Option<DateTime<Utc>> {
        let seconds = i64::from(offset.fix().local_minus_utc());
        local
            .checked_sub_signed(Duration::seconds(seconds))
            .map(|utc| utc.and_utc())
    }

    /// UTC offset in seconds in effect at `instant`.
    pub(crate) fn offset_seconds(&self, instant: DateTime<Utc>) -> i64 {
        self.offset_seconds_at(&instant.naive_utc())
    }

    fn offset_seconds_at(&self, utc: &NaiveDateTime) -> i64 {
        i64::from(self.zone.offset_from_utc_datetime(utc).fix().local_minus_utc())
    }

    /// First instant after the gap that swallowed `local`.
    ///
    /// Both offsets around the gap are sampled a day away from it, then the
    /// transition instant is bisected to the second. Assumes no second
    /// transition within a day of the gap, which holds for the whole IANA
    /// database.
    fn end_of_gap(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let day = Duration::days(1);
        let before = self.offset_seconds_at(&local.checked_sub_signed(day).unwrap_or(local));
        let after = self.offset_seconds_at(&local.checked_add_signed(day).unwrap_or(local));
        let with_before = || {
            local
                .checked_sub_signed(Duration::seconds(before))
                .map(|utc| utc.and_utc())
        };
        if after <= before {
            // No forward jump around `local`: the wall clock only failed to
            // resolve because it lies at the edge of the supported range.
            return with_before();
        }

        let wall = local.and_utc().timestamp();
        // `lo` still carries the old offset, `hi` already the new one.
        let mut lo = wall - after;
        let mut hi = wall - before + 1;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            let sample = DateTime::from_timestamp(mid, 0).map(|dt| dt.naive_utc());
            match sample {
                Some(sample) if self.offset_seconds_at(&sample) == before => lo = mid,
                _ => hi = mid,
            }
        }

        DateTime::from_timestamp(hi, 0).or_else(with_before)
    }
}
