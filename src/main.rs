//! pricedesk: keyboard-driven pricing dashboard for the terminal.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use pricedesk::{
    api::{HttpPricingApi, MemoryPricingApi, PricingApi},
    config::{self, AppConfig, TuiPreferences, Validatable},
    grid::GridController,
    model::{FilterState, Permissions},
    tui::{App, SystemClipboard, run_tui},
};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pricedesk")]
#[command(version)]
#[command(about = "Keyboard-driven pricing dashboard", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Open the catalog against the configured API
    pricedesk browse

    # Store page, only products in stock from two brands
    pricedesk browse --page store --query \"con_stock=true&marca=LG&marca=Philco\"

    # Try the dashboard without a backend
    pricedesk browse --demo")]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `browse` subcommand
#[derive(Parser)]
struct BrowseArgs {
    /// Page to open: catalog or store
    #[arg(long)]
    page: Option<String>,

    /// Pricing API base URL
    #[arg(long, env = "PRICEDESK_API_URL")]
    api_url: Option<String>,

    /// Bearer token
    #[arg(long, env = "PRICEDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// File holding the bearer token
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Initial filter as a query string (e.g. "search=aire&con_stock=true&page=2")
    #[arg(long)]
    query: Option<String>,

    /// Initial search text (overrides `search` in --query)
    #[arg(short, long)]
    search: Option<String>,

    /// Disable every edit regardless of server permissions
    #[arg(long)]
    read_only: bool,

    /// Use a built-in sample catalog instead of the API
    #[arg(long)]
    demo: bool,

    /// Log file (the terminal belongs to the dashboard)
    #[arg(long, env = "PRICEDESK_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the pricing dashboard
    Browse(BrowseArgs),

    /// Show the configuration, its JSON schema, or an example file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print the JSON Schema for the config file
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a commented example config
    Example,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Browse(args) => {
            init_logging(cli.verbose, args.log_file.clone())?;
            browse(cli.config, args)
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Schema { output } => {
                let schema = config::generate_json_schema();
                match output {
                    Some(path) => {
                        std::fs::write(&path, &schema)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        eprintln!("Schema written to {}", path.display());
                    }
                    None => println!("{schema}"),
                }
                Ok(())
            }
            ConfigAction::Example => {
                print!("{}", config::generate_full_example_config());
                Ok(())
            }
        },

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "pricedesk", &mut io::stdout());
            Ok(())
        }
    }
}

/// Send `tracing` output to a file; stderr is hidden behind the alternate
/// screen while the dashboard runs.
fn init_logging(verbose: bool, log_file: Option<PathBuf>) -> Result<()> {
    let path = log_file
        .or_else(|| dirs::cache_dir().map(|d| d.join("pricedesk").join("pricedesk.log")))
        .context("no log file given and no cache directory available")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();
    Ok(())
}

fn browse(config_path: Option<PathBuf>, args: BrowseArgs) -> Result<()> {
    let mut overrides = AppConfig::builder()
        .token(args.token)
        .token_file(args.token_file);
    if let Some(url) = args.api_url {
        overrides = overrides.api_url(url);
    }
    if let Some(page) = args.page {
        overrides = overrides.page(page);
    }
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(config_path.as_deref(), &overrides.build());
    if let Some(path) = &loaded_from {
        tracing::info!("Loaded config from {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let report: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", report.join("\n  "));
    }

    let mut filter = match args.query.as_deref() {
        Some(query) => FilterState::from_query_string(query).context("invalid --query")?,
        None => FilterState {
            page_size: config.tui.page_size,
            ..FilterState::default()
        },
    };
    if let Some(search) = args.search.as_deref() {
        filter.set_search(search);
    }

    let api: Arc<dyn PricingApi> = if args.demo {
        Arc::new(MemoryPricingApi::demo())
    } else {
        let client_config = config
            .api
            .to_client_config()
            .context("failed to read API credentials")?;
        Arc::new(HttpPricingApi::new(client_config).context("failed to create API client")?)
    };

    let permissions = if args.read_only {
        Permissions::read_only()
    } else {
        match api.permissions() {
            Ok(permissions) => permissions,
            Err(e) => {
                tracing::warn!("could not load permissions, starting read-only: {e}");
                Permissions::read_only()
            }
        }
    };

    let mut preferences = TuiPreferences::load();
    if !TuiPreferences::config_path().is_some_and(|p| p.exists()) {
        preferences.theme.clone_from(&config.tui.theme);
    }

    let mut grid = GridController::new(
        config.tui.page_variant(),
        config.grid_settings(&preferences),
        Box::new(SystemClipboard),
    )
    .with_permissions(permissions)
    .with_filter(filter);
    grid.reload();

    tracing::info!(
        backend = api.name(),
        page = config.tui.page_variant().title(),
        "starting dashboard"
    );
    let mut app = App::new(grid, api, config, preferences);
    run_tui(&mut app).context("terminal error")?;
    Ok(())
}
