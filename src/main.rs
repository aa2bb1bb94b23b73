mod cli;

use holocron::render::{self, Kind};
use holocron_core::config::Config;
use holocron_core::{CharacterId, FavoriteId, PlanetId, UserId, VehicleId};
use holocron_db::models::{NewFavorite, NewUser};
use holocron_db::pool::{get_conn, init_pool_from_config, DbPool};
use holocron_db::queries::{favorites, users};
use holocron_db::views::ExternalView;
use holocron_db::{import, migrations};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, FavoriteCommand, UserCommand};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let open = || open_catalog(cli.config.as_deref(), cli.database.as_deref(), cli.verbose);

    match &cli.command {
        // `validate` reports config problems itself.
        Commands::Validate { config } => {
            init_logging(cli.verbose, None);
            validate_config(config.as_deref().or(cli.config.as_deref()))
        }
        Commands::Init => init_database(&open()?),
        Commands::Import { file } => import_file(&open()?, file),
        Commands::Show { kind, id } => show_record(&open()?, *kind, *id),
        Commands::List { kind } => list_records(&open()?, *kind),
        Commands::User(UserCommand::Add {
            username,
            email,
            password,
            inactive,
        }) => add_user(
            &open()?,
            username.clone(),
            email.clone(),
            password.clone(),
            !inactive,
        ),
        Commands::Favorite(FavoriteCommand::Add {
            user_id,
            name,
            character,
            planet,
            vehicle,
        }) => {
            let mut new = NewFavorite::new(UserId::from(*user_id), name.clone());
            new.character_id = character.map(CharacterId::from);
            new.planet_id = planet.map(PlanetId::from);
            new.vehicle_id = vehicle.map(VehicleId::from);
            add_favorite(&open()?, &new)
        }
        Commands::Favorite(FavoriteCommand::Remove { id }) => remove_favorite(&open()?, *id),
    }
}

/// Load config, install logging and open the catalog database.
fn open_catalog(
    config_path: Option<&Path>,
    database_override: Option<&Path>,
    verbose: bool,
) -> Result<DbPool> {
    let config = Config::load_or_default(config_path).context("Failed to load config")?;
    init_logging(verbose, config.logging.filter.as_deref());
    for warning in config.validate() {
        tracing::warn!("Config: {warning}");
    }
    open_pool(&config, database_override)
}

/// Install the stderr log subscriber.
///
/// Respects RUST_LOG if set, then `--verbose`, then `[logging] filter`.
fn init_logging(verbose: bool, configured: Option<&str>) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "holocron=debug,holocron_db=debug,holocron_core=debug".to_string()
        } else if let Some(filter) = configured.filter(|f| !f.trim().is_empty()) {
            filter.to_string()
        } else {
            "holocron=info,holocron_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_pool(config: &Config, database_override: Option<&Path>) -> Result<DbPool> {
    let mut db_config = config.database.clone();
    if let Some(path) = database_override {
        db_config.path = path.to_path_buf();
    }

    let path = db_config.resolved_path();
    tracing::debug!("Opening database at {}", path.display());
    init_pool_from_config(&db_config)
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

fn init_database(pool: &DbPool) -> Result<()> {
    let conn = get_conn(pool)?;
    let version = migrations::current_version(&conn)?;
    println!("Database ready (schema version {version})");
    Ok(())
}

fn import_file(pool: &DbPool, file: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read catalog file: {}", file.display()))?;

    let conn = get_conn(pool)?;
    let summary = import::import_catalog(&conn, &contents)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!(
        "Imported {} species, {} planets, {} vehicles, {} characters",
        summary.species, summary.planets, summary.vehicles, summary.characters
    );
    Ok(())
}

fn show_record(pool: &DbPool, kind: Kind, id: i64) -> Result<()> {
    let conn = get_conn(pool)?;
    match render::show(&conn, kind, id)? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        None => anyhow::bail!("{kind} {id} not found"),
    }
}

fn list_records(pool: &DbPool, kind: Kind) -> Result<()> {
    let conn = get_conn(pool)?;
    let value = render::list(&conn, kind)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn add_user(
    pool: &DbPool,
    username: String,
    email: String,
    password: String,
    is_active: bool,
) -> Result<()> {
    let conn = get_conn(pool)?;
    let new = NewUser {
        username,
        email,
        password,
        is_active,
    };
    let user = users::create_user(&conn, &new)
        .with_context(|| format!("Failed to create user '{}'", new.username))?;

    tracing::info!("Created user {} ({})", user.username, user.id);
    println!("{}", serde_json::to_string_pretty(&user.serialize_with(&[])?)?);
    Ok(())
}

fn add_favorite(pool: &DbPool, new: &NewFavorite) -> Result<()> {
    let conn = get_conn(pool)?;
    let favorite = favorites::create_favorite(&conn, new)
        .with_context(|| format!("Failed to create favorite '{}'", new.name))?;

    println!("{}", serde_json::to_string_pretty(&favorite.serialize()?)?);
    Ok(())
}

fn remove_favorite(pool: &DbPool, id: i64) -> Result<()> {
    let conn = get_conn(pool)?;
    if !favorites::delete_favorite(&conn, FavoriteId::from(id))? {
        anyhow::bail!("favorite {id} not found");
    }
    println!("Removed favorite {id}");
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p).with_context(|| format!("Invalid config: {}", p.display()))?
        }
        None => {
            println!("No config file specified, checking default locations");
            Config::load_or_default(None)?
        }
    };

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        for warning in &warnings {
            println!("warning: {warning}");
        }
    }
    println!("  Database: {}", config.database.resolved_path().display());
    println!("  Pool size: {}", config.database.pool_size);
    println!(
        "  Log filter: {}",
        config.logging.filter.as_deref().unwrap_or("(default)")
    );

    Ok(())
}
