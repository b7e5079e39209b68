use super::types::{ColumnType, TableSchema, ViewSchema};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let sql_type = match col.col_type {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            // Dates and times are stored normalized as text
            ColumnType::Text | ColumnType::Date | ColumnType::Time => "TEXT",
        };

        let pk = if col.name == schema.primary_key {
            " PRIMARY KEY"
        } else {
            ""
        };
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };

        columns.push(format!(
            "    {} {}{}{}",
            col.name, sql_type, pk, null_constraint
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX idx_{}_{} ON {}({})",
                schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect()
}

/// Generate CREATE VIEW SQL for a view schema
pub fn generate_create_view(view: &ViewSchema) -> String {
    format!("CREATE VIEW {} AS\n{}", view.name, view.select_sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{MOVIES, SCREENINGS};
    use crate::schema::views::MOVIE_GENRE_RATINGS;

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&MOVIES);
        assert!(sql.contains("CREATE TABLE movies"));
        assert!(sql.contains("movie_id INTEGER PRIMARY KEY"));
        assert!(sql.contains("movie_title TEXT NOT NULL"));
        assert!(sql.contains("imdb_rating REAL NOT NULL"));
        assert!(sql.contains("FOREIGN KEY (genre_id) REFERENCES genres(genre_id)"));
    }

    #[test]
    fn test_date_and_time_columns_stored_as_text() {
        let sql = generate_create_table(&SCREENINGS);
        assert!(sql.contains("screening_date TEXT NOT NULL"));
        assert!(sql.contains("screening_time TEXT NOT NULL"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&SCREENINGS);
        assert!(indexes.iter().any(|i| i.contains("idx_screenings_movie_id")));
        assert!(indexes
            .iter()
            .any(|i| i.contains("idx_screenings_theater_id")));
    }

    #[test]
    fn test_generate_create_view() {
        let sql = generate_create_view(&MOVIE_GENRE_RATINGS);
        assert!(sql.starts_with("CREATE VIEW movie_genre_ratings AS"));
        assert!(sql.contains("combined_rating"));
        assert!(sql.contains("JOIN genres g"));
    }
}
