use anyhow::{Context, Result};
use chrono::{DateTime, Utc, Weekday};
use clap::{Parser, Subcommand};
use local_days::{format_instant, parse_instant, LocalDaysCalculator, GERMANY_TIMEZONE};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "local-days",
    version,
    about = "DST-safe local day and month boundaries"
)]
struct Cli {
    /// IANA timezone the boundaries are computed in
    #[arg(short = 'z', long, env = "LOCAL_DAYS_TZ", default_value = GERMANY_TIMEZONE, global = true)]
    timezone: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add local calendar days, keeping the local time of day
    AddDays {
        /// RFC 3339 instant
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
        /// Number of days, may be negative
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    /// Start of the local day containing the instant
    StartOfDay {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
    },
    /// Start of the local day after the one containing the instant
    StartOfNextDay {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
    },
    /// Start of the local month containing the instant
    StartOfMonth {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
    },
    /// Start of the local month after the one containing the instant
    StartOfNextMonth {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
    },
    /// Local weekday of the instant
    Weekday {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
    },
    /// Start of the next local day falling on the given weekday
    NextWeekday {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
        /// Weekday name, e.g. "friday" or "fri"
        #[arg(value_parser = parse_weekday)]
        weekday: Weekday,
    },
    /// Whether the instant is exactly local midnight
    IsMidnight {
        #[arg(value_parser = parse_instant)]
        instant: DateTime<Utc>,
    },
}

#[derive(Serialize)]
struct InstantReport {
    input: String,
    result: String,
    result_local: String,
    timezone: String,
}

#[derive(Serialize)]
struct WeekdayReport {
    input: String,
    timezone: String,
    weekday: &'static str,
}

#[derive(Serialize)]
struct MidnightReport {
    input: String,
    timezone: String,
    is_local_midnight: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let calc = LocalDaysCalculator::new(&cli.timezone)
        .with_context(|| format!("cannot compute local days for '{}'", cli.timezone))?;

    let report = run(&calc, cli.command)?;
    tracing::debug!(timezone = calc.timezone().name(), "command finished");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run(calc: &LocalDaysCalculator, command: Command) -> Result<serde_json::Value> {
    let report = match command {
        Command::AddDays { instant, days } => {
            let result = calc
                .checked_add_local_days(instant, days)
                .with_context(|| format!("adding {days} local days leaves the supported range"))?;
            instant_report(calc, instant, result)?
        }
        Command::StartOfDay { instant } => {
            instant_report(calc, instant, calc.start_of_local_day(instant))?
        }
        Command::StartOfNextDay { instant } => {
            instant_report(calc, instant, calc.start_of_next_local_day(instant))?
        }
        Command::StartOfMonth { instant } => {
            instant_report(calc, instant, calc.start_of_local_month(instant))?
        }
        Command::StartOfNextMonth { instant } => {
            instant_report(calc, instant, calc.start_of_next_local_month(instant))?
        }
        Command::NextWeekday { instant, weekday } => {
            instant_report(calc, instant, calc.next_local_weekday(instant, weekday))?
        }
        Command::Weekday { instant } => serde_json::to_value(WeekdayReport {
            input: format_instant(instant, &Utc),
            timezone: timezone_name(calc),
            weekday: weekday_name(calc.local_weekday(instant)),
        })?,
        Command::IsMidnight { instant } => serde_json::to_value(MidnightReport {
            input: format_instant(instant, &Utc),
            timezone: timezone_name(calc),
            is_local_midnight: calc.is_local_midnight(instant),
        })?,
    };
    Ok(report)
}

fn instant_report(
    calc: &LocalDaysCalculator,
    input: DateTime<Utc>,
    result: DateTime<Utc>,
) -> Result<serde_json::Value> {
    let report = serde_json::to_value(InstantReport {
        input: format_instant(input, &Utc),
        result: format_instant(result, &Utc),
        result_local: format_instant(result, calc.timezone()),
        timezone: timezone_name(calc),
    })?;
    Ok(report)
}

fn timezone_name(calc: &LocalDaysCalculator) -> String {
    calc.timezone().name().to_string()
}

fn parse_weekday(s: &str) -> std::result::Result<Weekday, String> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("'{s}' is not a weekday (expected e.g. 'monday' or 'mon')"))
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
