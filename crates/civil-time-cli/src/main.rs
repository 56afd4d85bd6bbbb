//! `civtime`: calendar arithmetic from the command line.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use civil_time::{
    last_period, last_weekday, next_period, next_weekday, parse, parse_iso8601, Calendar,
    CalendarConfig, CalendarIdentifier, CalendarOffset, CalendarPeriod, CivilInstant, Style,
    UnitsStyle, WeekStartDay, Weekday,
};

/// Month-aware date arithmetic, weekday resolution and formatting.
#[derive(Parser, Debug)]
#[command(name = "civtime")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a JSON calendar config ({"calendar", "timezone", "week_start"})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// IANA time zone, overriding the config (e.g. "America/New_York")
    #[arg(short, long, global = true)]
    timezone: Option<String>,

    /// Calendar identifier, overriding the config
    #[arg(long, global = true)]
    calendar: Option<String>,

    /// First day of the week (sunday or monday), overriding the config
    #[arg(long, global = true)]
    week_start: Option<WeekStartDay>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a calendar offset to an instant
    Add {
        /// ISO 8601 timestamp, or now/today/yesterday/tomorrow
        instant: String,
        /// Offset such as "1y2mo3d" or "+2w 4h"
        #[arg(allow_hyphen_values = true)]
        offset: String,
    },
    /// Subtract a calendar offset from an instant
    Sub {
        /// ISO 8601 timestamp, or now/today/yesterday/tomorrow
        instant: String,
        /// Offset such as "1y2mo3d" or "+2w 4h"
        #[arg(allow_hyphen_values = true)]
        offset: String,
    },
    /// Calendar difference A - B
    Diff {
        /// Later instant (ISO 8601 or now/today/yesterday/tomorrow)
        a: String,
        /// Earlier instant
        b: String,
        /// Units style: full, short or abbreviated
        #[arg(short, long, default_value = "full")]
        units: UnitsStyle,
    },
    /// Next weekday (inclusive) or the range of the next period
    Next {
        /// Weekday name ("friday", "fri") or period ("week", "month", ...)
        target: String,
        /// Reference instant (defaults to now)
        #[arg(short, long, default_value = "now")]
        from: String,
    },
    /// Last weekday (inclusive) or the range of the last period
    Last {
        /// Weekday name ("friday", "fri") or period ("week", "month", ...)
        target: String,
        /// Reference instant (defaults to now)
        #[arg(short, long, default_value = "now")]
        from: String,
    },
    /// Render an instant in a date and time style
    Format {
        /// ISO 8601 timestamp, or now/today/yesterday/tomorrow
        instant: String,
        /// none, short, medium, long or full
        #[arg(short, long, default_value = "medium")]
        date_style: Style,
        /// none, short, medium, long or full
        #[arg(short = 's', long, default_value = "medium")]
        time_style: Style,
    },
    /// Parse text into an instant
    Parse {
        text: String,
        /// chrono strftime pattern (ISO 8601 when omitted)
        #[arg(short, long)]
        pattern: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let calendar = load_calendar(&cli)?;
    debug!(
        calendar = %calendar.identifier(),
        timezone = calendar.time_zone().name(),
        "calendar loaded"
    );

    match &cli.command {
        Command::Add { instant, offset } => run_shift(&calendar, instant, offset, false, cli.json),
        Command::Sub { instant, offset } => run_shift(&calendar, instant, offset, true, cli.json),
        Command::Diff { a, b, units } => run_diff(&calendar, a, b, *units, cli.json),
        Command::Next { target, from } => run_relative(&calendar, target, from, true, cli.json),
        Command::Last { target, from } => run_relative(&calendar, target, from, false, cli.json),
        Command::Format {
            instant,
            date_style,
            time_style,
        } => run_format(&calendar, instant, *date_style, *time_style, cli.json),
        Command::Parse { text, pattern } => run_parse(&calendar, text, pattern.as_deref(), cli.json),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file first, then command-line overrides.
fn load_calendar(cli: &Cli) -> Result<Arc<Calendar>> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            CalendarConfig::from_json(&text)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => CalendarConfig::default(),
    };
    if let Some(tz) = &cli.timezone {
        config.timezone = tz.clone();
    }
    if let Some(id) = &cli.calendar {
        config.calendar = id.parse::<CalendarIdentifier>()?.to_string();
    }
    if let Some(week_start) = cli.week_start {
        config.week_start = week_start;
    }
    Ok(Calendar::from_config(&config)?.shared())
}

fn resolve_instant(text: &str, calendar: &Arc<Calendar>) -> Result<CivilInstant> {
    let instant = match text.trim().to_lowercase().as_str() {
        "now" => CivilInstant::now(calendar),
        "today" => CivilInstant::today(calendar)?,
        "yesterday" => CivilInstant::yesterday(calendar)?,
        "tomorrow" => CivilInstant::tomorrow(calendar)?,
        _ => parse_iso8601(text, calendar)
            .with_context(|| format!("invalid instant '{text}'"))?,
    };
    Ok(instant)
}

fn emit(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn run_shift(
    calendar: &Arc<Calendar>,
    instant: &str,
    offset: &str,
    subtract: bool,
    json: bool,
) -> Result<()> {
    let start = resolve_instant(instant, calendar)?;
    let offset: CalendarOffset = offset
        .parse()
        .with_context(|| format!("invalid offset '{offset}'"))?;
    let result = if subtract {
        start.subtract(&offset)?
    } else {
        start.add(&offset)?
    };

    if json {
        emit(json!({ "input": start, "offset": offset, "result": result }))
    } else {
        println!("{result}");
        Ok(())
    }
}

fn run_diff(
    calendar: &Arc<Calendar>,
    a: &str,
    b: &str,
    units: UnitsStyle,
    json: bool,
) -> Result<()> {
    let a = resolve_instant(a, calendar)?;
    let b = resolve_instant(b, calendar)?;
    let offset = a.difference(&b)?;

    if json {
        emit(json!({
            "a": a,
            "b": b,
            "offset": offset,
            "text": offset.format(units),
        }))
    } else {
        println!("{}", offset.format(units));
        Ok(())
    }
}

fn run_relative(
    calendar: &Arc<Calendar>,
    target: &str,
    from: &str,
    forward: bool,
    json: bool,
) -> Result<()> {
    let reference = resolve_instant(from, calendar)?;

    if let Ok(weekday) = target.parse::<Weekday>() {
        let result = if forward {
            next_weekday(weekday, &reference)?
        } else {
            last_weekday(weekday, &reference)?
        };
        return if json {
            emit(json!({ "weekday": weekday, "reference": reference, "result": result }))
        } else {
            println!("{result}");
            Ok(())
        };
    }

    let Ok(period) = target.parse::<CalendarPeriod>() else {
        bail!("'{target}' is neither a weekday nor a calendar period");
    };
    let range = if forward {
        next_period(period, &reference)?
    } else {
        last_period(period, &reference)?
    };
    if json {
        emit(json!({
            "period": period,
            "reference": reference,
            "start": range.start(),
            "end": range.end(),
        }))
    } else {
        println!("{}", range.start());
        println!("{}", range.end());
        Ok(())
    }
}

fn run_format(
    calendar: &Arc<Calendar>,
    instant: &str,
    date_style: Style,
    time_style: Style,
    json: bool,
) -> Result<()> {
    let instant = resolve_instant(instant, calendar)?;
    let text = civil_time::format(&instant, date_style, time_style);

    if json {
        emit(json!({
            "instant": instant,
            "date_style": date_style,
            "time_style": time_style,
            "text": text,
        }))
    } else {
        println!("{text}");
        Ok(())
    }
}

fn run_parse(
    calendar: &Arc<Calendar>,
    text: &str,
    pattern: Option<&str>,
    json: bool,
) -> Result<()> {
    let instant = match pattern {
        Some(p) => parse(text, p, calendar),
        None => parse_iso8601(text, calendar),
    }
    .with_context(|| format!("could not parse '{text}'"))?;

    if json {
        emit(json!({ "text": text, "pattern": pattern, "result": instant }))
    } else {
        println!("{instant}");
        Ok(())
    }
}
