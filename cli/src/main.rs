mod render;
mod summary;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use spendcity_core::{
    build_user_map, read_user_spending, AnnotationIndex, EnvIdentity, FileGridStateRepository,
    FileSpendingRepository, IdentityProvider, LoadOutcome, MapConfig, MapError, MapService,
    SpendingFileLocator, SpendingRepository, StaticIdentity, CONFIG_FILE_NAME,
};
use tracing::{debug, error, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::render::{CellInspector, TextMapRenderer};
use crate::summary::allocation_table;

#[derive(Parser)]
#[command(name = "spendcity")]
#[command(about = "Turns categorized spending into a map of buildings", long_about = None)]
struct Cli {
    /// Data directory holding config.json and the saved map [default: ~/.spendcity]
    #[arg(long, global = true, env = "SPENDCITY_HOME")]
    home: Option<PathBuf>,

    /// Config file [default: <home>/config.json]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Grid side length, overriding the config file
    #[arg(long, global = true)]
    map_size: Option<usize>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Build a new map from a user's spending file and save it
    Generate {
        /// User whose spending file is read [default: $SPENDCITY_USER]
        #[arg(long)]
        user: Option<String>,
        /// Seed for a reproducible layout
        #[arg(long)]
        seed: Option<u64>,
        /// Read this spending file instead of searching for the user's
        #[arg(long)]
        spending_file: Option<PathBuf>,
    },
    /// Print the saved map
    Show,
    /// Describe one cell of the saved map
    Inspect {
        row: usize,
        col: usize,
        /// User whose spending annotates the cell [default: $SPENDCITY_USER]
        #[arg(long)]
        user: Option<String>,
    },
    /// Replace the saved map with an empty one
    Reset,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    debug!(?config, "resolved configuration");

    let repo = FileGridStateRepository::new(config.state_path(), config.map_size);
    let locator = SpendingFileLocator::new(config.spending_dirs.clone());

    match cli.command {
        Some(Commands::Generate {
            user,
            seed,
            spending_file,
        }) => {
            let mut config = config;
            if seed.is_some() {
                config.seed = seed;
            }
            let service = MapService::new(repo, config);
            generate(&service, &locator, user, spending_file.as_deref())
        }
        Some(Commands::Inspect { row, col, user }) => {
            let service = MapService::new(repo, config);
            inspect(&service, &locator, user, row, col)
        }
        Some(Commands::Reset) => {
            let service = MapService::new(repo, config);
            service.reset().context("Unable to reset the saved map")?;
            println!("Map reset: {}", service.config().state_path().display());
            Ok(())
        }
        Some(Commands::Show) | None => {
            let service = MapService::new(repo, config);
            show(&service)
        }
    }
}

fn load_config(cli: &Cli) -> Result<MapConfig> {
    let home = match &cli.home {
        Some(home) => home.clone(),
        None => MapConfig::default_data_dir()?,
    };
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| home.join(CONFIG_FILE_NAME));
    let mut config = MapConfig::load(&config_path, home)
        .with_context(|| format!("Unable to load config from {}", config_path.display()))?;

    if let Some(map_size) = cli.map_size {
        config.map_size = map_size;
        config.validate()?;
    }
    Ok(config)
}

fn identity_for(user: Option<String>) -> Box<dyn IdentityProvider> {
    match user {
        Some(user) => Box::new(StaticIdentity::new(Some(user))),
        None => Box::new(EnvIdentity::default()),
    }
}

fn generate(
    service: &MapService<FileGridStateRepository>,
    locator: &SpendingFileLocator,
    user: Option<String>,
    spending_file: Option<&Path>,
) -> Result<()> {
    let layout = match spending_file {
        Some(path) => {
            let entries = FileSpendingRepository::new(path).list()?;
            service.generate_and_save(&entries)?
        }
        None => {
            let identity = identity_for(user);
            let user_map = build_user_map(identity.as_ref(), locator, service)?;
            println!(
                "User: {} ({})",
                user_map.user,
                user_map.spending_path.display()
            );
            user_map.layout
        }
    };

    println!("{}", allocation_table(&layout));
    if let Some(seed) = layout.seed {
        println!("Seed: {}", seed);
    }
    for (category, failed) in layout.report.shortfalls() {
        println!("Warning: {} building(s) for {} did not fit", failed, category);
    }
    println!("Map saved: {}", service.config().state_path().display());
    Ok(())
}

fn load_with_warning(service: &MapService<FileGridStateRepository>) -> Result<LoadOutcome> {
    let outcome = service.load_or_regenerate()?;
    if let Some(warning) = outcome.source.warning() {
        println!("Warning: {}", warning);
    }
    Ok(outcome)
}

fn show(service: &MapService<FileGridStateRepository>) -> Result<()> {
    let outcome = load_with_warning(service)?;
    print!("{}", TextMapRenderer::draw(&outcome.state));
    println!(
        "{} building(s), house {}",
        outcome.state.building_locations().len(),
        if outcome.state.house_placed() { "placed" } else { "not placed" }
    );
    Ok(())
}

fn inspect(
    service: &MapService<FileGridStateRepository>,
    locator: &SpendingFileLocator,
    user: Option<String>,
    row: usize,
    col: usize,
) -> Result<()> {
    let outcome = load_with_warning(service)?;
    let cell = outcome.state.get(row, col)?;

    // Annotations are best effort; the map is still worth describing without them.
    let identity = identity_for(user);
    let annotations = match read_user_spending(identity.as_ref(), locator) {
        Ok((_, _, entries)) => Some(AnnotationIndex::from_entries(&entries)),
        Err(e @ (MapError::MissingUserContext | MapError::SpendingFileNotFound { .. })) => {
            warn!("no spending annotations: {}", e);
            None
        }
        Err(e) => return Err(e.into()),
    };

    match CellInspector::inspect(&outcome.state, annotations.as_ref(), row, col) {
        Some((marker, Some(annotation))) => {
            println!("({}, {}): {}", row, col, marker);
            println!("  Built:    {}", annotation.built_date);
            println!("  Category: {}", annotation.category);
            println!("  Spend:    {:.2}", annotation.amount);
        }
        Some((marker, None)) => println!("({}, {}): {}", row, col, marker),
        None => println!("({}, {}): {}", row, col, cell.marker()),
    }
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},spendcity_core={}",
            env!("CARGO_CRATE_NAME"),
            level,
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "spendcity",
            "--home",
            "/tmp/city",
            "generate",
            "--user",
            "alice",
            "--seed",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/city")));
        match cli.command {
            Some(Commands::Generate { user, seed, .. }) => {
                assert_eq!(user.as_deref(), Some("alice"));
                assert_eq!(seed, Some(4));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_map_size_override_is_validated() {
        let dir = tempfile::TempDir::new().unwrap();
        let home = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["spendcity", "--home", home, "--map-size", "0", "show"])
            .unwrap();
        assert!(load_config(&cli).is_err());

        let cli = Cli::try_parse_from(["spendcity", "--home", home, "--map-size", "8", "show"])
            .unwrap();
        assert_eq!(load_config(&cli).unwrap().map_size, 8);
    }
}
