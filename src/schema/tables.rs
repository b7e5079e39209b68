//! Base table definitions for the movie analytics schema

use super::types::*;

// =============================================================================
// Reference Tables (no FK dependencies)
// =============================================================================

pub static GENRES: TableSchema = TableSchema {
    name: "genres",
    source_file: "genres.csv",
    primary_key: "genre_id",
    columns: &[
        Column::required("genre_id", ColumnType::Integer),
        Column::required("genre_name", ColumnType::Text),
    ],
    foreign_keys: &[],
    load_filter: None,
};

pub static THEATERS: TableSchema = TableSchema {
    name: "theaters",
    source_file: "theaters.csv",
    primary_key: "theater_id",
    columns: &[
        Column::required("theater_id", ColumnType::Integer),
        Column::required("theater_name", ColumnType::Text),
    ],
    foreign_keys: &[],
    load_filter: None,
};

// =============================================================================
// Dependent Tables
// =============================================================================

pub static MOVIES: TableSchema = TableSchema {
    name: "movies",
    source_file: "movies.csv",
    primary_key: "movie_id",
    columns: &[
        Column::required("movie_id", ColumnType::Integer),
        Column::required("movie_title", ColumnType::Text),
        Column::required("release_year", ColumnType::Integer),
        Column::required("genre_id", ColumnType::Integer),
        // Rating scales: IMDB 0-10, Rotten Tomatoes and Metacritic 0-100
        Column::required("imdb_rating", ColumnType::Real),
        Column::required("rotten_tomatoes", ColumnType::Real),
        Column::required("metacritic", ColumnType::Real),
    ],
    foreign_keys: &[ForeignKey::new("genre_id", "genres", "genre_id")],
    load_filter: None,
};

pub static SCREENINGS: TableSchema = TableSchema {
    name: "screenings",
    source_file: "screenings.csv",
    primary_key: "screening_id",
    columns: &[
        Column::required("screening_id", ColumnType::Integer),
        Column::required("movie_id", ColumnType::Integer),
        Column::required("theater_id", ColumnType::Integer),
        Column::required("screening_date", ColumnType::Date),
        Column::required("screening_time", ColumnType::Time),
        Column::required("revenue", ColumnType::Real),
        Column::required("tickets_sold", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("movie_id", "movies", "movie_id"),
        ForeignKey::new("theater_id", "theaters", "theater_id"),
    ],
    // Screenings that reference an unknown theater are dropped, not rejected
    load_filter: Some(ReferentialFilter {
        column: "theater_id",
        references_table: "theaters",
        references_column: "theater_id",
    }),
};

/// All base tables in dependency order (parents before fact tables)
pub static ALL_TABLES: &[&TableSchema] = &[&GENRES, &THEATERS, &MOVIES, &SCREENINGS];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
