use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, Weekday};
use clap::Parser;

use recurring_events::client::Client;
use recurring_events::dates::parse_weekday;
use recurring_events::engine::{SyncRequest, Synchronizer};
use recurring_events::settings::{credentials_from_lookup, Settings};
use recurring_events::Result;

#[derive(Parser)]
#[command(name = "create-recurring")]
#[command(about = "Create the occurrences of recurring events on a WordPress events calendar")]
struct Cli {
    /// Settings file (server, defaults and templates)
    #[arg(long, default_value = "recurring.toml")]
    config: PathBuf,

    /// Weekday to create occurrences for, by name or index (Monday = 0). Can be repeated
    #[arg(long = "day", value_parser = parse_day)]
    days: Vec<Weekday>,

    /// Same as `--day sunday`
    #[arg(long)]
    sunday: bool,

    /// Same as `--day friday`
    #[arg(long)]
    friday: bool,

    /// Number of weeks to create
    #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..=52))]
    weeks: u32,

    /// Date from which to start events: yyyy-mm-dd
    #[arg(long, value_parser = parse_date)]
    startdate: Option<NaiveDate>,

    /// Only create the template with this key. Can be repeated
    #[arg(long = "only")]
    only: Vec<String>,

    /// Do not create or update anything, only show what would be done
    #[arg(long)]
    dryrun: bool,

    /// Overwrite events that already exist
    #[arg(long)]
    update: bool,

    /// Seconds to pause between two dates (overrides the settings file)
    #[arg(long)]
    delay: Option<u64>,
}

fn parse_day(text: &str) -> std::result::Result<Weekday, String> {
    parse_weekday(text).map_err(|err| err.to_string())
}

fn parse_date(text: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|err| format!("invalid date '{}': {}", text, err))
}

impl Cli {
    fn weekdays(&self) -> Vec<Weekday> {
        let mut weekdays = self.days.clone();
        if self.sunday { weekdays.push(Weekday::Sun); }
        if self.friday { weekdays.push(Weekday::Fri); }

        let mut unique = Vec::new();
        for weekday in weekdays {
            if unique.contains(&weekday) == false {
                unique.push(weekday);
            }
        }
        unique
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => (),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            log::error!("{}", err);
            eprintln!("Error: {}", err);
            std::process::exit(2);
        },
    }
}

/// Returns whether the run was successful
async fn run(cli: Cli) -> Result<bool> {
    let weekdays = cli.weekdays();
    if weekdays.is_empty() {
        return Err(recurring_events::Error::Config("No day specified (use --day, --sunday or --friday)".to_string()));
    }

    let settings = Settings::from_file(&cli.config)?;
    // Invalid templates are reported before anything is sent
    let templates = settings.templates()?;
    let lookup = |key: &str| std::env::var(key).ok();
    let client = Client::new(settings.server_url(lookup)?, credentials_from_lookup(lookup)?)?;

    let request = SyncRequest {
        weekdays,
        start_date: cli.startdate,
        week_count: cli.weeks,
        limit_keys: cli.only,
        dry_run: cli.dryrun,
        allow_update: cli.update,
        delay: cli.delay.map(Duration::from_secs).unwrap_or_else(|| settings.delay()),
    };

    let mut synchronizer = Synchronizer::new(client, templates, settings.defaults.clone())
        .with_paging(settings.sync.paging);
    let summary = synchronizer.synchronize(&request).await;

    if request.dry_run {
        println!("Dry run: nothing has been sent");
    }
    println!("{}", summary);
    Ok(summary.is_success())
}
