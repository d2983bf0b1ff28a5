use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use newsdesk_core::{export_csv, export_file_name, Dashboard, FilterSet, TickerRotation};
use newsdesk_feed::logging::init_logging;
use newsdesk_feed::{published_feed, refresh, reload, ArticleSource, FeedConfig};
use newsdesk_web::ServeConfig;
use tokio::sync::RwLock;
use tracing::{info, Level};

mod display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HumanDuration(Duration);

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3600),
        'd' => Some(86_400),
        _ => None,
    }
}

/// Accepts `1h15m30s` style values; a trailing bare number is seconds.
impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let too_long = || format!("Duration too long: {}", s);
        let mut total = 0u64;
        let mut digits = String::new();
        let mut parts = 0;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if digits.is_empty() {
                return Err(format!("Expected a number before '{}'", c));
            }
            let per_unit =
                unit_seconds(c).ok_or_else(|| format!("Invalid duration unit: {}", c))?;
            let amount: u64 = digits.parse().map_err(|_| too_long())?;
            total = amount
                .checked_mul(per_unit)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(too_long)?;
            digits.clear();
            parts += 1;
        }

        if !digits.is_empty() {
            let secs: u64 = digits.parse().map_err(|_| too_long())?;
            total = total.checked_add(secs).ok_or_else(too_long)?;
            parts += 1;
        }
        if parts == 0 {
            return Err("Duration must include a number".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Dashboard redaktorů: klasifikované články z publikované tabulky", long_about = None)]
struct Cli {
    /// Published CSV export of the editors' sheet
    #[arg(long, global = true)]
    feed_url: Option<String>,
    /// Request timeout (e.g. 30s, 1m)
    #[arg(long, global = true, default_value = "30s")]
    timeout: HumanDuration,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Only this region (exact match, e.g. CZ)
    #[arg(long)]
    region: Option<String>,
    /// Only these topics; repeat for several
    #[arg(long = "topic")]
    topics: Vec<String>,
    /// Only this importance (1-5)
    #[arg(long)]
    importance: Option<String>,
}

impl From<FilterArgs> for FilterSet {
    fn from(args: FilterArgs) -> Self {
        FilterSet {
            region: args.region,
            topics: args.topics.into_iter().collect(),
            importance: args.importance,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the ranked, filtered articles
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Show at most this many cards
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Rotate through the most important articles
    Ticker {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "5s")]
        interval: HumanDuration,
        /// Stop after this many rotations
        #[arg(long, default_value_t = 10)]
        cycles: usize,
    },
    /// Show the values available for filtering
    Options,
    /// Write the filtered articles as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Defaults to clanky_<date>.csv in the current directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Reload periodically and print the summary (e.g. 1h, 30m, 1h15m30s)
    Watch {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "5m")]
        interval: HumanDuration,
    },
    /// Serve the dashboard JSON API
    Serve {
        #[arg(long, default_value = newsdesk_web::DEFAULT_BIND)]
        bind: SocketAddr,
        /// Rotation pace advertised to dashboard clients
        #[arg(long, default_value = "5s")]
        ticker_interval: HumanDuration,
    },
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Loads the sheet into a fresh dashboard; a failed load is reported with
/// the dashboard's error message and a retry hint.
async fn load_dashboard(
    source: &dyn ArticleSource,
    filters: FilterSet,
) -> anyhow::Result<Dashboard> {
    let dashboard = RwLock::new(Dashboard::new());
    refresh(&dashboard, source).await;
    let mut dashboard = dashboard.into_inner();
    if let Some(message) = dashboard.error() {
        bail!("{} ({}). Zkuste to znovu.", message, source.describe());
    }
    dashboard.set_filters(filters);
    Ok(dashboard)
}

async fn run_ticker(
    source: &dyn ArticleSource,
    filters: FilterSet,
    interval: Duration,
    cycles: usize,
) -> anyhow::Result<()> {
    let dashboard = load_dashboard(source, filters).await?;
    let mut ticker = dashboard.ticker();
    let Some(first) = ticker.current() else {
        println!("Žádné zprávy s nejvyšší důležitostí.");
        return Ok(());
    };
    println!("{}", display::render_ticker(first, 0, ticker.len(), Utc::now()));
    if ticker.len() == 1 {
        return Ok(());
    }

    let rotation = TickerRotation::spawn(ticker.len(), interval);
    let mut index = rotation.subscribe();
    for _ in 0..cycles {
        if index.changed().await.is_err() {
            break;
        }
        let position = *index.borrow_and_update();
        let len = ticker.len();
        if let Some(article) = ticker.seek(position) {
            println!("{}", display::render_ticker(article, position, len, Utc::now()));
        }
    }
    Ok(())
}

async fn run_watch(
    source: &dyn ArticleSource,
    filters: FilterSet,
    interval: Duration,
) -> anyhow::Result<()> {
    let dashboard = RwLock::new(Dashboard::new());
    dashboard.write().await.set_filters(filters);
    info!("Running in periodic mode with {}s interval", interval.as_secs());
    loop {
        reload(&dashboard, source).await;
        {
            let state = dashboard.read().await;
            let updated = state
                .last_updated()
                .map(|t| t.format("%d.%m.%Y %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            match state.error() {
                Some(message) => eprintln!("⚠️ {}", message),
                None => println!("{} · poslední aktualizace: {} UTC", state.summary(), updated),
            }
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(log_level(cli.verbose));

    let mut config = FeedConfig::default().with_timeout(cli.timeout.0);
    if let Some(url) = cli.feed_url {
        config = config.with_url(url);
    }
    let source = Arc::new(published_feed(&config)?);
    info!("Reading {}", source.describe());

    match cli.command {
        Commands::List { filters, limit } => {
            let dashboard = load_dashboard(source.as_ref(), filters.into()).await?;
            println!("{}\n", dashboard.summary());
            let visible = dashboard.visible();
            if visible.is_empty() {
                println!("Žádné články neodpovídají zadaným filtrům.");
            } else {
                let shown = limit.map_or(visible.len(), |n| n.min(visible.len()));
                print!("{}", display::render_list(&visible[..shown], Utc::now()));
            }
        }
        Commands::Ticker { filters, interval, cycles } => {
            run_ticker(source.as_ref(), filters.into(), interval.0, cycles).await?;
        }
        Commands::Options => {
            let dashboard = load_dashboard(source.as_ref(), FilterSet::new()).await?;
            print!("{}", display::render_options(&dashboard.options()));
        }
        Commands::Export { filters, output } => {
            let dashboard = load_dashboard(source.as_ref(), filters.into()).await?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now().date_naive())));
            let csv = export_csv(dashboard.visible())?;
            tokio::fs::write(&path, csv)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exportováno {} článků do {}", dashboard.visible().len(), path.display());
        }
        Commands::Watch { filters, interval } => {
            run_watch(source.as_ref(), filters.into(), interval.0).await?;
        }
        Commands::Serve { bind, ticker_interval } => {
            let config = ServeConfig { bind, ticker_interval: ticker_interval.0 };
            newsdesk_web::serve(config, source).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        let parse = |s: &str| s.parse::<HumanDuration>().map(|d| d.0);
        assert_eq!(parse("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse("5m"), Ok(Duration::from_secs(300)));
        assert_eq!(parse("1h15m30s"), Ok(Duration::from_secs(4530)));
        assert_eq!(parse("90"), Ok(Duration::from_secs(90)));
        assert!(parse("").is_err());
        assert!(parse("5w").is_err());
        assert!(parse("m").is_err());
        assert!(parse("999999999999999999d").is_err());
        assert!(parse("99999999999999999999").is_err());
        assert!(parse("18446744073709551615s1s").is_err());
    }

    #[test]
    fn test_filter_args_into_set() {
        let args = FilterArgs {
            region: Some("CZ".to_string()),
            topics: vec!["Sport".to_string(), "Sport".to_string(), "Kultura".to_string()],
            importance: None,
        };
        let filters: FilterSet = args.into();
        let expected = FilterSet::new().with_region("CZ").with_topic("Sport").with_topic("Kultura");
        assert_eq!(filters, expected);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "newsdesk", "list", "--region", "CZ", "--topic", "Sport", "--topic", "Politika",
            "--limit", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::List { filters, limit } => {
                assert_eq!(filters.region.as_deref(), Some("CZ"));
                assert_eq!(filters.topics, vec!["Sport", "Politika"]);
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.timeout, HumanDuration(Duration::from_secs(30)));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(2), Level::DEBUG);
    }
}
