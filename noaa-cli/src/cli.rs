use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use noaa_core::{
    Config, Datum, Interval, NamedDate, Product, TidesRequest, TimeZone, Unit, client_from_config,
};
use std::io::{self, Write};
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "noaa", version, about = "NOAA Tides and Currents CLI")]
pub struct Cli {
    /// Log requests to stderr. `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store default station, datum, units and time zone.
    Configure,

    /// Fetch data from NOAA and print it.
    Fetch {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the JSON document as received instead of a table.
        #[arg(long)]
        raw: bool,

        /// Print the decoded rows as JSON instead of a table.
        #[arg(long, conflicts_with = "raw")]
        json: bool,
    },

    /// Print the request URL without sending it.
    Url {
        #[command(flatten)]
        query: QueryArgs,
    },
}

/// Request options; anything left out falls back to the stored config.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Data product, e.g. "water_level" or "predictions".
    #[arg(short, long)]
    pub product: Product,

    /// Station id, e.g. "8454000".
    #[arg(short, long)]
    pub station: Option<String>,

    /// Start of the range: "YYYY-MM-DD", "YYYY-MM-DD HH:MM" or "YYYYMMDD HH:MM".
    #[arg(long, value_parser = parse_datetime)]
    pub begin: Option<NaiveDateTime>,

    /// End of the range, same formats as --begin.
    #[arg(long, value_parser = parse_datetime)]
    pub end: Option<NaiveDateTime>,

    /// Length of the range in hours.
    #[arg(long)]
    pub range: Option<u32>,

    /// Named range: today, latest or recent.
    #[arg(long)]
    pub date: Option<NamedDate>,

    #[arg(long)]
    pub datum: Option<Datum>,

    /// english or metric.
    #[arg(long)]
    pub units: Option<Unit>,

    /// gmt, lst or lst_ldt.
    #[arg(long)]
    pub time_zone: Option<TimeZone>,

    /// hilo or h; six-minute data when absent.
    #[arg(long)]
    pub interval: Option<Interval>,
}

impl QueryArgs {
    pub fn into_request(self, config: &Config) -> TidesRequest {
        let mut request = TidesRequest::new().product(self.product);

        if let Some(begin) = self.begin {
            request = request.begin_date(begin);
        }
        if let Some(end) = self.end {
            request = request.end_date(end);
        }
        if let Some(hours) = self.range {
            request = request.range(hours);
        }
        if let Some(date) = self.date {
            request = request.date(date);
        }
        if let Some(station) = self.station {
            request = request.station(station);
        }
        if let Some(datum) = self.datum {
            request = request.datum(datum);
        }
        if let Some(units) = self.units {
            request = request.units(units);
        }
        if let Some(tz) = self.time_zone {
            request = request.timezone(tz);
        }
        if let Some(interval) = self.interval {
            request = request.interval(interval);
        }

        config.apply_defaults(request)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Fetch { query, raw, json } => {
                let config = Config::load()?;
                let request = query.into_request(&config);
                let client = client_from_config(&config)?;
                debug!(?request, "fetching");

                if raw {
                    let document = client
                        .fetch_json(&request)
                        .await
                        .context("NOAA request failed")?;
                    let mut stdout = io::stdout().lock();
                    serde_json::to_writer_pretty(&mut stdout, &document)?;
                    writeln!(stdout)?;
                } else {
                    let response = client.fetch(&request).await.context("NOAA request failed")?;
                    let mut stdout = io::stdout().lock();
                    if json {
                        output::write_json(&mut stdout, &response)?;
                    } else {
                        output::write_response(&mut stdout, &response)?;
                    }
                }
                Ok(())
            }
            Command::Url { query } => {
                let config = Config::load()?;
                let url = query.into_request(&config).url(config.base_url())?;
                println!("{url}");
                Ok(())
            }
        }
    }
}

/// Interactive prompts for the stored defaults.
fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let station = Text::new("Default station id:")
        .with_initial_value(config.station.as_deref().unwrap_or_default())
        .with_help_message("Leave empty to always pass --station")
        .prompt()?;
    let station = station.trim();
    config.station = (!station.is_empty()).then(|| station.to_string());

    config.datum = Some(select("Default datum:", Datum::all(), config.datum)?);
    config.units = Some(select("Default units:", Unit::all(), config.units)?);
    config.time_zone = Some(select("Default time zone:", TimeZone::all(), config.time_zone)?);

    config.timeout_secs = Some(
        CustomType::<u64>::new("Request timeout (seconds):")
            .with_default(config.timeout_secs())
            .prompt()?,
    );

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn select<T>(message: &str, options: &[T], current: Option<T>) -> anyhow::Result<T>
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let cursor = current
        .and_then(|c| options.iter().position(|o| *o == c))
        .unwrap_or(0);

    Ok(Select::new(message, options.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?)
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    for format in ["%Y-%m-%d %H:%M", "%Y%m%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("'{s}' is not YYYY-MM-DD, YYYY-MM-DD HH:MM or YYYYMMDD HH:MM"))
}
