//! Parameterized select builder over the derived views.
//!
//! Identifiers (view names, columns) come from the static catalog and are
//! validated against the view's declared columns; caller values are always
//! bound as `?` parameters, including the row limit. Filter clauses combine
//! with AND semantics.

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

use crate::error::{Error, Result};
use crate::schema::ViewSchema;

/// Sort direction for an ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// A single filter clause.
#[derive(Debug, Clone)]
pub enum Filter {
    /// `column = value`
    Equals { column: &'static str, value: Value },
    /// `column BETWEEN low AND high`, inclusive on both bounds
    Between {
        column: &'static str,
        low: Value,
        high: Value,
    },
    /// `column >= value`
    AtLeast { column: &'static str, value: Value },
}

impl Filter {
    fn column(&self) -> &'static str {
        match self {
            Filter::Equals { column, .. } => column,
            Filter::Between { column, .. } => column,
            Filter::AtLeast { column, .. } => column,
        }
    }
}

/// Builder for one filtered, ordered, limited SELECT against a named view.
pub struct SelectQuery {
    view: &'static ViewSchema,
    columns: Vec<&'static str>,
    distinct: bool,
    filters: Vec<Filter>,
    order: Vec<(&'static str, SortOrder)>,
    limit: Option<u32>,
}

impl SelectQuery {
    pub fn from_view(view: &'static ViewSchema) -> Self {
        Self {
            view,
            columns: Vec::new(),
            distinct: false,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    /// Project a subset of the view's columns (default: all of them).
    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.columns = columns.to_vec();
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append an ORDER BY key. Call again to add a tie-break key.
    pub fn order_by(mut self, column: &'static str, order: SortOrder) -> Self {
        self.order.push((column, order));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the SQL text and the parameter list to bind.
    pub fn build(&self) -> Result<(String, Vec<Value>)> {
        for col in &self.columns {
            self.check_column(col)?;
        }
        for filter in &self.filters {
            self.check_column(filter.column())?;
        }
        for (col, _) in &self.order {
            self.check_column(col)?;
        }

        let projection = if self.columns.is_empty() {
            self.view.columns.join(", ")
        } else {
            self.columns.join(", ")
        };

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&projection);
        sql.push_str(" FROM ");
        sql.push_str(self.view.name);

        let mut params: Vec<Value> = Vec::new();

        if !self.filters.is_empty() {
            let mut clauses = Vec::with_capacity(self.filters.len());
            for filter in &self.filters {
                match filter {
                    Filter::Equals { column, value } => {
                        clauses.push(format!("{} = ?", column));
                        params.push(value.clone());
                    }
                    Filter::Between { column, low, high } => {
                        clauses.push(format!("{} BETWEEN ? AND ?", column));
                        params.push(low.clone());
                        params.push(high.clone());
                    }
                    Filter::AtLeast { column, value } => {
                        clauses.push(format!("{} >= ?", column));
                        params.push(value.clone());
                    }
                }
            }
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        if !self.order.is_empty() {
            let keys: Vec<String> = self
                .order
                .iter()
                .map(|(col, dir)| format!("{} {}", col, dir.keyword()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Value::Integer(i64::from(limit)));
        }

        Ok((sql, params))
    }

    /// Execute against `conn`, mapping each result row through `map`.
    /// No matching rows is a valid outcome: the Vec is simply empty.
    pub fn run<T, F>(&self, conn: &Connection, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let (sql, params) = self.build()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), map)?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(rows)
    }

    fn check_column(&self, column: &str) -> Result<()> {
        if self.view.has_column(column) {
            Ok(())
        } else {
            Err(Error::InvalidFilter(format!(
                "view '{}' has no column '{}'",
                self.view.name, column
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::views::{MOVIE_GENRE_RATINGS, POPULAR_SCREENING_TIMES};

    #[test]
    fn test_full_query_shape() {
        let (sql, params) = SelectQuery::from_view(&MOVIE_GENRE_RATINGS)
            .columns(&["movie_title", "genre_name", "release_year", "combined_rating"])
            .filter(Filter::Equals {
                column: "genre_name",
                value: Value::Text("Drama".into()),
            })
            .filter(Filter::Between {
                column: "release_year",
                low: Value::Integer(1990),
                high: Value::Integer(2000),
            })
            .filter(Filter::AtLeast {
                column: "combined_rating",
                value: Value::Real(7.5),
            })
            .order_by("combined_rating", SortOrder::Descending)
            .order_by("movie_id", SortOrder::Ascending)
            .limit(10)
            .build()
            .unwrap();

        assert_eq!(
            sql,
            "SELECT movie_title, genre_name, release_year, combined_rating \
             FROM movie_genre_ratings \
             WHERE genre_name = ? AND release_year BETWEEN ? AND ? AND combined_rating >= ? \
             ORDER BY combined_rating DESC, movie_id ASC LIMIT ?"
        );
        assert_eq!(params.len(), 5);
        assert_eq!(params[0], Value::Text("Drama".into()));
        assert_eq!(params[4], Value::Integer(10));
    }

    #[test]
    fn test_no_filters_means_no_where() {
        let (sql, params) = SelectQuery::from_view(&POPULAR_SCREENING_TIMES)
            .order_by("hour", SortOrder::Ascending)
            .build()
            .unwrap();

        assert_eq!(
            sql,
            "SELECT hour, total_screenings, total_tickets_sold \
             FROM popular_screening_times ORDER BY hour ASC"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_distinct_projection() {
        let (sql, _) = SelectQuery::from_view(&MOVIE_GENRE_RATINGS)
            .columns(&["genre_name"])
            .distinct()
            .order_by("genre_name", SortOrder::Ascending)
            .build()
            .unwrap();

        assert_eq!(
            sql,
            "SELECT DISTINCT genre_name FROM movie_genre_ratings ORDER BY genre_name ASC"
        );
    }

    #[test]
    fn test_unknown_filter_column_rejected() {
        let err = SelectQuery::from_view(&POPULAR_SCREENING_TIMES)
            .filter(Filter::Equals {
                column: "genre_name",
                value: Value::Text("Drama".into()),
            })
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::InvalidFilter(_)));
    }

    #[test]
    fn test_unknown_order_column_rejected() {
        let err = SelectQuery::from_view(&POPULAR_SCREENING_TIMES)
            .order_by("revenue", SortOrder::Ascending)
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::InvalidFilter(_)));
    }
}
