//! # local-days
//!
//! DST-safe local calendar boundaries.
//!
//! Adding "one day" to an absolute instant is not the same as adding 24
//! hours once a timezone observes daylight saving time: a local day lasts 23
//! or 25 hours on transition days, and local midnight moves by an hour in
//! UTC. This crate computes local day and month boundaries, local weekdays
//! and local day arithmetic for any IANA timezone, taking and returning
//! absolute `DateTime<Utc>` instants.
//!
//! ## Modules
//!
//! - [`calculator`] — [`LocalDaysCalculator`], bound to one timezone
//! - [`instant`] — RFC 3339 parsing/formatting helpers
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc, Weekday};
//! use local_days::LocalDaysCalculator;
//!
//! let berlin = LocalDaysCalculator::new("Europe/Berlin")?;
//! let instant = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
//!
//! assert_eq!(
//!     berlin.start_of_local_day(instant),
//!     Utc.with_ymd_and_hms(2021, 12, 31, 23, 0, 0).unwrap()
//! );
//! assert_eq!(berlin.local_weekday(instant), Weekday::Sat);
//! # Ok::<(), local_days::LocalDaysError>(())
//! ```

pub mod calculator;
mod converter;
pub mod error;
pub mod instant;

pub use calculator::{LocalDaysCalculator, GERMANY_TIMEZONE};
pub use chrono::Weekday;
pub use error::{LocalDaysError, Result};
pub use instant::{format_instant, parse_instant};
