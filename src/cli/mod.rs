// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(about = "Larder - Allergen-safe recipe retrieval service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the retrieval server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Bulk-load recipes from a JSON file into the corpus
    Import {
        /// Path to a JSON array of recipes
        input: String,
    },

    /// Run one retrieval directly against the corpus and print the results
    Filter {
        /// Free-text search intent
        #[arg(default_value = "")]
        query: String,

        /// Upper calorie bound
        #[arg(long, default_value_t = 2000)]
        max_calories: i64,

        /// Declared allergen (repeatable)
        #[arg(long = "allergen")]
        allergens: Vec<String>,
    },
}
