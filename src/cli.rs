use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::query::reports::{DEFAULT_TOP_MOVIES, DEFAULT_TOP_REVENUE, DEFAULT_TOP_THEATERS};

#[derive(Parser, Debug)]
#[command(name = "movie-analytics")]
#[command(version, about = "Movie and theater screening analytics over SQLite")]
pub struct Cli {
    /// Output format for report commands
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Column-aligned plain text
    Table,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database from CSV source files
    Init {
        /// Output SQLite database path
        database: PathBuf,

        /// Directory containing genres.csv, movies.csv, theaters.csv,
        /// screenings.csv
        #[arg(short, long, default_value = "source")]
        source_dir: PathBuf,

        /// Overwrite an existing database file
        #[arg(short, long)]
        force: bool,
    },

    /// Top movies of a genre by combined rating
    TopMovies {
        /// SQLite database path
        database: PathBuf,

        /// Genre name to rank within
        #[arg(short, long)]
        genre: String,

        /// Inclusive release-year span, e.g. 1990,2000 (default: full span)
        #[arg(long, value_delimiter = ',')]
        years: Option<Vec<i64>>,

        /// Number of movies to show
        #[arg(short, long, default_value_t = DEFAULT_TOP_MOVIES)]
        top_n: u32,

        /// Only movies with at least this combined rating
        #[arg(short, long)]
        min_rating: Option<f64>,
    },

    /// Screening and ticket totals per hour of day
    ScreeningTimes {
        /// SQLite database path
        database: PathBuf,

        /// Inclusive hour span, e.g. 18,23 (default: 0,23)
        #[arg(long, value_delimiter = ',')]
        hours: Option<Vec<i64>>,
    },

    /// Revenue and ticket totals per calendar month
    MonthlySales {
        /// SQLite database path
        database: PathBuf,

        /// Inclusive month span, e.g. 6,8 (default: 1,12)
        #[arg(long, value_delimiter = ',')]
        months: Option<Vec<i64>>,
    },

    /// Top theaters by total screening revenue
    TheatersRevenue {
        /// SQLite database path
        database: PathBuf,

        /// Number of theaters to show
        #[arg(short, long, default_value_t = DEFAULT_TOP_THEATERS)]
        top_n: u32,
    },

    /// Average rating sources per genre, with revenue rank
    GenreRatings {
        /// SQLite database path
        database: PathBuf,

        /// Only show these genres (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        genres: Option<Vec<String>>,
    },

    /// Top movies by total screening revenue
    TopRevenue {
        /// SQLite database path
        database: PathBuf,

        /// Inclusive release-year span, e.g. 1990,2000 (default: all years)
        #[arg(long, value_delimiter = ',')]
        years: Option<Vec<i64>>,

        /// Number of movies to show
        #[arg(short, long, default_value_t = DEFAULT_TOP_REVENUE)]
        top_n: u32,
    },

    /// List all genre names
    Genres {
        /// SQLite database path
        database: PathBuf,
    },

    /// Print the min/max release year on record
    YearRange {
        /// SQLite database path
        database: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
