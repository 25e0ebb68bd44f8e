//! # Progman - headless Program Manager desktop
//!
//! Command-line front end to the MDI core: inspects and edits the group
//! store, runs the arrangement commands against it, and replays recorded
//! input scripts through a desktop.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;

use progman::config::expand_home;
use progman::replay;
use progman::{GroupId, GroupStore, MdiCommand, MdiDesktop, ProgmanConfig, Size};

#[derive(Parser)]
#[command(name = "progman")]
#[command(about = "Headless MDI window manager for a retro Program Manager shell")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/progman/progman.toml")]
    config: String,

    /// Path to the group store
    #[arg(short, long, default_value = "~/.config/progman/program-manager-data.json")]
    store: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List groups with their window state
    List,
    /// Create a new group
    NewGroup { name: String },
    /// Delete a group by id
    DeleteGroup { id: String },
    /// Cascade every group window
    Cascade,
    /// Tile visible group windows inside a container
    Tile {
        #[arg(long)]
        width: i32,
        #[arg(long)]
        height: i32,
    },
    /// Line up minimized group icons
    ArrangeIcons,
    /// Feed a recorded JSON input script through the desktop
    Replay {
        script: PathBuf,
        #[arg(long)]
        width: Option<i32>,
        #[arg(long)]
        height: Option<i32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config is read before logging starts so its debug flag can apply
    let (config, source) = read_config(&cli.config)?;
    let filter = log_filter(cli.debug, &config);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    info!(
        "🚀 Progman {} ({} built {})",
        progman::VERSION,
        env!("GIT_COMMIT"),
        env!("BUILD_DATE")
    );
    report_config(&cli.config, &source);

    let store_path = expand_home(&cli.store)?;
    let store = GroupStore::load(&store_path, config.general.save_on_commit)?;
    let mut desktop = MdiDesktop::from_store(config, store);

    let changed = match cli.command {
        Commands::List => {
            print_groups(&desktop);
            false
        }
        Commands::NewGroup { name } => {
            let id = desktop.create_group(&name);
            println!("{}", id);
            true
        }
        Commands::DeleteGroup { id } => {
            desktop
                .delete_group(&GroupId::new(id))
                .context("Failed to delete group")?;
            true
        }
        Commands::Cascade => desktop.dispatch(MdiCommand::Cascade),
        Commands::Tile { width, height } => {
            desktop.set_container(Some(Size::new(width, height)));
            desktop.dispatch(MdiCommand::Tile)
        }
        Commands::ArrangeIcons => desktop.dispatch(MdiCommand::ArrangeIcons),
        Commands::Replay {
            script,
            width,
            height,
        } => {
            let steps = replay::load_script(&script)?;
            if let (Some(width), Some(height)) = (width, height) {
                desktop.set_container(Some(Size::new(width, height)));
            }
            let summary = replay::run(&mut desktop, &steps);
            println!(
                "{} steps, {} commits, {} live frames, {} rejected",
                summary.steps, summary.commits, summary.frames_rendered, summary.rejected
            );
            print_groups(&desktop);
            summary.commits > 0 || summary.steps > summary.rejected
        }
    };

    // With autosave every mutation has already been written
    if changed && !desktop.config().general.save_on_commit {
        desktop.store().save()?;
        info!("💾 Group store saved to {}", store_path.display());
    }

    Ok(())
}

/// Where the configuration in use came from
enum ConfigSource {
    Defaults,
    File,
    Invalid(anyhow::Error),
}

fn read_config(path: &str) -> Result<(ProgmanConfig, ConfigSource)> {
    if !expand_home(path)?.exists() {
        return Ok((ProgmanConfig::default(), ConfigSource::Defaults));
    }

    Ok(match ProgmanConfig::load(path) {
        Ok(config) => (config, ConfigSource::File),
        Err(e) => (ProgmanConfig::default(), ConfigSource::Invalid(e)),
    })
}

fn report_config(path: &str, source: &ConfigSource) {
    match source {
        ConfigSource::Defaults => info!("📝 No configuration at {}, using defaults", path),
        ConfigSource::File => info!("✅ Configuration loaded from: {}", path),
        ConfigSource::Invalid(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            info!("📝 Using default configuration");
        }
    }
}

/// Debug logging is on when either the flag or the config asks for it
fn log_filter(cli_debug: bool, config: &ProgmanConfig) -> &'static str {
    if cli_debug || config.general.debug {
        "debug"
    } else {
        "info"
    }
}

fn print_groups(desktop: &MdiDesktop<GroupStore>) {
    let active = desktop.active_window();
    for group in desktop.groups() {
        let state = &group.window_state;
        let flag = if state.minimized {
            "minimized"
        } else if state.maximized {
            "maximized"
        } else if desktop.registry().contains(&group.id) {
            "open"
        } else {
            "closed"
        };
        let marker = if active == Some(&group.id) { "*" } else { " " };
        println!(
            "{} {:<36} {:<20} {:>5},{:<5} {:>4}x{:<4} {}",
            marker, group.id.as_str(), group.name, state.x, state.y, state.width, state.height, flag
        );
    }
}
