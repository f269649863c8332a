//! Studio Dashboard - CLI entry point
//!
//! Opens the terminal dashboard or edits the persisted layout from scripts.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use studio_dashboard::commands::{self, CommandError};
use studio_dashboard::config::error::ConfigError;
use studio_dashboard::config::loader::ConfigLoader;
use studio_dashboard::config::schema::Config;
use studio_dashboard::config::{default, xdg};
use studio_dashboard::tui::app::App;
use studio_dashboard::{logging, open_store, TUI_LOG_FILE};
use widget_grid::InteractionController;

/// Studio dashboard widget layout
#[derive(Debug, Parser)]
#[command(name = "studio-dash")]
#[command(version, about = "Compose and edit the studio dashboard")]
struct Cli {
    /// Configuration file (defaults to the XDG config path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dashboard scope, overriding `[dashboard] scope`
    #[arg(long, global = true)]
    scope: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the studio-dash CLI
#[derive(Debug, Subcommand)]
enum Commands {
    /// Launch the terminal user interface
    Tui,

    /// List catalog widgets
    Widgets {
        /// Only widgets of this module (general, projects, crm, ...)
        #[arg(long)]
        module: Option<String>,
        /// Case-insensitive search on id, title and description
        #[arg(long)]
        search: Option<String>,
    },

    /// List dashboard templates
    Templates,

    /// Inspect or edit the saved layout
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `layout` subcommand.
#[derive(Debug, Subcommand)]
enum LayoutAction {
    /// Print the current layout
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a widget at the bottom of the dashboard
    Add {
        /// Catalog widget id
        widget_id: String,
    },
    /// Remove a widget
    Remove {
        /// Active widget id
        widget_id: String,
    },
    /// Resize a widget (width snaps to 1, 2 or 4 columns)
    Resize {
        /// Active widget id
        widget_id: String,
        /// Width in columns
        width: i32,
        /// Height in rows
        height: i32,
    },
    /// Move a widget to another position (1-based, as in `layout show`)
    Move {
        /// Current position
        from: usize,
        /// New position
        to: usize,
    },
    /// Replace the dashboard with a template
    Apply {
        /// Template id (see `studio-dash templates`)
        template_id: String,
    },
    /// Restore the starter dashboard
    Reset,
}

/// Actions for the `config` subcommand.
#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Config { action } = &cli.command {
        return run_config_command(action, cli.config.as_deref());
    }

    let config = match load_config(cli.config.as_deref(), cli.scope) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Tui => run_tui(&config),
        Commands::Widgets { module, search } => {
            init_logging(&config, None);
            let store = open_store(&config);
            print_result(commands::list_widgets(
                &store,
                module.as_deref(),
                search.as_deref(),
            ))
        }
        Commands::Templates => {
            init_logging(&config, None);
            print_result(Ok(commands::list_templates(&open_store(&config))))
        }
        Commands::Layout { action } => {
            init_logging(&config, None);
            run_layout_command(action, &config)
        }
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}

/// Loads the config file, applies the `--scope` override and validates.
fn load_config(path: Option<&Path>, scope: Option<String>) -> Result<Config, ConfigError> {
    let mut config = ConfigLoader::load(path)?;
    if let Some(scope) = scope {
        config.dashboard.scope = scope;
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &Config, fallback_file: Option<&Path>) {
    if let Err(e) = logging::init(&config.log, fallback_file) {
        eprintln!("Warning: failed to open log file: {e}");
    }
}

fn print_result(result: Result<String, CommandError>) -> ExitCode {
    match result {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_layout_command(action: LayoutAction, config: &Config) -> ExitCode {
    let mut store = open_store(config);
    let result = match action {
        LayoutAction::Show { json } => commands::show_layout(&store, json),
        LayoutAction::Add { widget_id } => commands::add_widget(&mut store, &widget_id),
        LayoutAction::Remove { widget_id } => commands::remove_widget(&mut store, &widget_id),
        LayoutAction::Resize {
            widget_id,
            width,
            height,
        } => commands::resize_widget(&mut store, &widget_id, width, height),
        LayoutAction::Move { from, to } => commands::move_widget(&mut store, from, to),
        LayoutAction::Apply { template_id } => commands::apply_template(&mut store, &template_id),
        LayoutAction::Reset => Ok(commands::reset_layout(&mut store)),
    };
    print_result(result)
}

fn run_tui(config: &Config) -> ExitCode {
    // log lines on stderr would draw over the dashboard
    let fallback = config.storage.resolved_dir().join(TUI_LOG_FILE);
    init_logging(config, Some(&fallback));

    let width = crossterm::terminal::size().map_or(80, |(w, _)| w);
    let controller = InteractionController::with_options(
        open_store(config),
        config.tui.viewport_options(width),
    );
    let mut app = App::new(controller, config.tui.clone());

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("TUI error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = rt.block_on(app.run()) {
        eprintln!("TUI error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run_config_command(action: &ConfigAction, path: Option<&Path>) -> ExitCode {
    let result = match action {
        ConfigAction::Init { force } => {
            let created = match path {
                Some(p) => default::create_default_config_at(p, *force).map(|()| p.to_path_buf()),
                None => default::create_default_config(*force),
            };
            created.map(|p| println!("Created configuration at {}", p.display()))
        }
        ConfigAction::Path => {
            let p = path.map_or_else(xdg::config_path, Path::to_path_buf);
            println!("{}", p.display());
            Ok(())
        }
        ConfigAction::Validate => validate_config(path).map(|rendered| {
            println!("Configuration is valid");
            print!("{rendered}");
        }),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads and validates the config, returning it re-rendered as TOML.
fn validate_config(path: Option<&Path>) -> Result<String, ConfigError> {
    let config = ConfigLoader::load(path)?;
    config.validate()?;
    toml::to_string_pretty(&config).map_err(|e| ConfigError::SerializeError {
        message: e.to_string(),
    })
}
