use clap::{Parser, Subcommand};
use holocron::render::Kind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "holocron")]
#[command(author, version, about = "Star Wars catalog store")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database (overrides the config file)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and apply migrations
    Init,

    /// Import a JSON catalog document
    Import {
        /// Catalog file to import
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Print one record as JSON
    Show {
        /// Record kind
        kind: Kind,

        /// Record id
        id: i64,
    },

    /// Print every record of a kind as a JSON array
    List {
        /// Record kind
        kind: Kind,
    },

    /// Manage user accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Manage favorites
    #[command(subcommand)]
    Favorite(FavoriteCommand),

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add {
        username: String,
        email: String,
        password: String,

        /// Create the account disabled
        #[arg(long)]
        inactive: bool,
    },
}

#[derive(Subcommand)]
pub enum FavoriteCommand {
    /// Favorite a catalog record for a user
    Add {
        /// Owning user id
        user_id: i64,

        /// Label for the favorite
        name: String,

        /// Character to favorite
        #[arg(long)]
        character: Option<i64>,

        /// Planet to favorite
        #[arg(long)]
        planet: Option<i64>,

        /// Vehicle to favorite
        #[arg(long)]
        vehicle: Option<i64>,
    },

    /// Remove a favorite
    Remove {
        /// Favorite id
        id: i64,
    },
}
