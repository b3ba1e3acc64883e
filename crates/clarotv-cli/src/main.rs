//! clarotv - Claro TV channel schedule browser.

/// Application configuration (TOML).
mod config;
/// Selection context, fetch gating, and fetch outcome.
mod controller;
/// Schedule presenter.
mod schedule;
/// Terminal UI components.
mod tui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use clarotv_api::epg::{EpgClient, ScheduleQuery, TimeWindow};
use clarotv_catalog::LocationCatalog;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::controller::{FetchPhase, run_fetch};
use crate::schedule::log_schedule;
use crate::tui::run_browser;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List state names.
    States,
    /// List the cities of a state.
    Cities(CitiesArgs),
    /// Fetch and print the schedule for a city and time window.
    Schedule(ScheduleArgs),
    /// Browse schedules interactively via TUI.
    Browse,
    /// Manage the configuration file.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `cities` subcommand.
#[derive(clap::Args)]
struct CitiesArgs {
    /// State name or abbreviation (e.g. "São Paulo", "SP").
    #[arg(long)]
    state: String,
}

/// Arguments for the `schedule` subcommand.
#[derive(clap::Args)]
struct ScheduleArgs {
    /// State name or abbreviation (e.g. "São Paulo", "SP").
    #[arg(long)]
    state: String,

    /// City name (e.g. "Campinas").
    #[arg(long)]
    city: String,

    /// Window start, "YYYY-MM-DD HH:MM:SS" wall-clock time.
    #[arg(long)]
    start: String,

    /// Window end, same format as --start. Must be after --start.
    #[arg(long)]
    end: String,

    /// IANA timezone for --start/--end (default: config `time.timezone`).
    #[arg(long)]
    timezone: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration.
    Show,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Loads the config from `--dir` or the default location.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Loads the location catalog, failing on any dataset error.
fn load_catalog(config: &AppConfig) -> Result<LocationCatalog> {
    LocationCatalog::load(&config.catalog.states_path, &config.catalog.cities_path)
        .context("failed to load location catalog")
}

/// Builds the EPG client from config.
fn build_epg_client(config: &AppConfig) -> Result<EpgClient> {
    EpgClient::builder()
        .base_url(config.epg_base_url()?)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build EPG client")
}

/// Runs the `states` subcommand.
fn run_states(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = load_catalog(&config)?;

    for state in catalog.states() {
        tracing::info!(
            "{}\t{}",
            state.abbreviation.as_deref().unwrap_or("--"),
            state.name
        );
    }
    tracing::info!("Total: {} states", catalog.states().len());

    Ok(())
}

/// Runs the `cities` subcommand.
fn run_cities(args: &CitiesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let catalog = load_catalog(&config)?;

    let Some(state) = catalog.resolve_state(&args.state) else {
        bail!("unknown state: {}", args.state);
    };

    let cities = catalog.list_cities(state);
    if cities.is_empty() {
        tracing::info!("No cities for {state}.");
        return Ok(());
    }
    for city in &cities {
        tracing::info!("{city}");
    }
    tracing::info!("Total: {} cities in {state}", cities.len());

    Ok(())
}

/// Runs the `schedule` subcommand.
///
/// # Errors
///
/// Returns an error if the window is invalid, the location is unknown, or
/// the request fails.
#[instrument(skip_all)]
async fn run_schedule(args: &ScheduleArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let timezone = args
        .timezone
        .as_deref()
        .unwrap_or(config.time.timezone.as_str());

    let window = TimeWindow::from_local(&args.start, &args.end, timezone)
        .context("invalid time window")?;

    let catalog = load_catalog(&config)?;
    let Some(state) = catalog.resolve_state(&args.state) else {
        bail!("unknown state: {}", args.state);
    };
    let Some(city) = catalog.resolve_city(state, &args.city) else {
        bail!("unknown city: {} ({state})", args.city);
    };

    let query = ScheduleQuery::new(state, city, window);
    let client = build_epg_client(&config)?;

    tracing::info!(
        "Fetching schedule for {} ({} -> {}, {timezone})",
        query.location(),
        args.start,
        args.end
    );

    match run_fetch(&client, &query, &config.epg.image_base_url).await {
        FetchPhase::Rendered(view) => {
            log_schedule(&view);
            Ok(())
        }
        FetchPhase::Failed(error) => {
            Err(anyhow::Error::new(error).context("failed to load schedule"))
        }
        FetchPhase::Idle | FetchPhase::Fetching => Ok(()),
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if config, client, or terminal setup fails.
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let tz = config.timezone()?;
    let client = build_epg_client(&config)?;

    let (catalog, load_error) =
        LocationCatalog::load_or_empty(&config.catalog.states_path, &config.catalog.cities_path);
    let status = load_error.map(|e| format!("Falha ao carregar estados/cidades: {e}"));

    run_browser(catalog, tz, &config.epg.image_base_url, &client, status).await
}

/// Runs the `config init` subcommand.
fn run_config_init(force: bool, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() && !force {
        bail!(
            "config already exists: {} (use --force to overwrite)",
            config_path.display()
        );
    }

    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote {}", config_path.display());

    Ok(())
}

/// Runs the `config show` subcommand.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let content = toml::to_string_pretty(&config).context("failed to serialize config")?;

    tracing::info!("# {}", config_path.display());
    for line in content.lines() {
        tracing::info!("{line}");
    }

    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_owned();
    clap_complete::generate(args.shell, &mut cmd, name, &mut io::stdout());
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(io::stdout.with_filter(|_| !tui::screen_active()))
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stdout.with_filter(|_| !tui::screen_active()));

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::States => run_states(cli.dir.as_ref()),
        Commands::Cities(args) => run_cities(&args, cli.dir.as_ref()),
        Commands::Schedule(args) => run_schedule(&args, cli.dir.as_ref()).await,
        Commands::Browse => run_browse(cli.dir.as_ref()).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init { force } => run_config_init(force, cli.dir.as_ref()),
            ConfigSubcommands::Show => run_config_show(cli.dir.as_ref()),
        },
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    }
}
