use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use prospect::app::{Dashboard, Flags};
use prospect::gateway::MockGateway;
use prospect::logging::{init_logging, LogConfig};
use prospect::widgets::Theme;
use prospect::{records, EngineOptions, PhoneMask, ProgramOptions, Windowing};
use tracing::info;

#[derive(ValueEnum, Debug, Clone, Copy)]
enum PhoneMaskArg {
    /// Keep the first and last three characters.
    Edges,
    /// Keep the first four characters.
    Prefix,
}

impl From<PhoneMaskArg> for PhoneMask {
    fn from(arg: PhoneMaskArg) -> Self {
        match arg {
            PhoneMaskArg::Edges => PhoneMask::EdgesKept,
            PhoneMaskArg::Prefix => PhoneMask::PrefixKept,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "prospect", version, about = "Browse people and companies in the terminal")]
struct Cli {
    /// Number of generated people.
    #[arg(long, default_value_t = 100_000)]
    people: usize,

    /// Number of generated companies.
    #[arg(long, default_value_t = 5_000)]
    companies: usize,

    /// Search debounce in milliseconds.
    #[arg(long = "debounce-ms", default_value_t = 300)]
    debounce_ms: u64,

    /// Render every row instead of only the visible window.
    #[arg(long = "no-virtualize")]
    no_virtualize: bool,

    /// Light colour palette.
    #[arg(long)]
    light: bool,

    #[arg(long = "phone-mask", value_enum, default_value = "edges")]
    phone_mask: PhoneMaskArg,

    /// Simulated backend latency in milliseconds.
    #[arg(long = "latency-ms", default_value_t = 250)]
    latency_ms: u64,

    /// Append logs to this file (filter with PROSPECT_LOG).
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        file: cli.log_file.clone(),
        verbose: cli.verbose,
    })?;

    let options = EngineOptions {
        debounce: Duration::from_millis(cli.debounce_ms),
        windowing: if cli.no_virtualize {
            Windowing::Full
        } else {
            Windowing::Virtualized
        },
        phone_mask: cli.phone_mask.into(),
        ..EngineOptions::default()
    };
    let theme = if cli.light { Theme::light() } else { Theme::dark() };
    let gateway = MockGateway::new(records::people(cli.people), records::companies(cli.companies))
        .with_latency(Duration::from_millis(cli.latency_ms));
    let flags = Flags::new(Arc::new(gateway), options, theme)?;

    info!(people = cli.people, companies = cli.companies, "starting");
    prospect::run_with::<Dashboard>(
        flags,
        ProgramOptions {
            title: Some("prospect".into()),
            ..ProgramOptions::default()
        },
    )
    .await?;
    Ok(())
}
