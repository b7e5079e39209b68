//! Derived analytical view definitions
//!
//! Each view is a plain `CREATE VIEW` over the base tables: reads always
//! re-evaluate the body, so a view reflects exactly the rows present in the
//! base tables at query time.

use super::types::ViewSchema;

/// One row per movie joined to its genre, with a blended rating.
///
/// `combined_rating` averages the three rating sources after normalizing
/// Rotten Tomatoes and Metacritic from their 0-100 scale down to IMDB's
/// 0-10 scale. `movie_id` is carried only as a deterministic tie-break key.
pub static MOVIE_GENRE_RATINGS: ViewSchema = ViewSchema {
    name: "movie_genre_ratings",
    columns: &[
        "movie_id",
        "movie_title",
        "genre_name",
        "release_year",
        "combined_rating",
    ],
    depends_on: &["movies", "genres"],
    select_sql: "\
SELECT m.movie_id,
       m.movie_title,
       g.genre_name,
       m.release_year,
       (m.imdb_rating + m.rotten_tomatoes / 10.0 + m.metacritic / 10.0) / 3.0 AS combined_rating
  FROM movies m
  JOIN genres g ON g.genre_id = m.genre_id",
};

/// One row per distinct hour-of-day with screening and ticket totals.
pub static POPULAR_SCREENING_TIMES: ViewSchema = ViewSchema {
    name: "popular_screening_times",
    columns: &["hour", "total_screenings", "total_tickets_sold"],
    depends_on: &["screenings"],
    select_sql: "\
SELECT CAST(substr(screening_time, 1, 2) AS INTEGER) AS hour,
       COUNT(*) AS total_screenings,
       SUM(tickets_sold) AS total_tickets_sold
  FROM screenings
 GROUP BY hour",
};

/// One row per calendar month (1-12) present in the fact data, summed
/// across all years.
pub static MONTHLY_MOVIE_PERFORMANCE: ViewSchema = ViewSchema {
    name: "monthly_movie_performance",
    columns: &["month", "revenue", "tickets_sold"],
    depends_on: &["screenings"],
    select_sql: "\
SELECT CAST(strftime('%m', screening_date) AS INTEGER) AS month,
       SUM(revenue) AS revenue,
       SUM(tickets_sold) AS tickets_sold
  FROM screenings
 GROUP BY month",
};

/// One row per theater with its summed screening revenue. Theaters with no
/// screenings are kept, with a total of zero.
pub static THEATER_SALES_ANALYSIS: ViewSchema = ViewSchema {
    name: "theater_sales_analysis",
    columns: &["theater_id", "theater_name", "total_revenue"],
    depends_on: &["theaters", "screenings"],
    select_sql: "\
SELECT t.theater_id,
       t.theater_name,
       COALESCE(SUM(s.revenue), 0.0) AS total_revenue
  FROM theaters t
  LEFT JOIN screenings s ON s.theater_id = t.theater_id
 GROUP BY t.theater_id, t.theater_name",
};

/// One row per genre that has at least one movie: average ratings over the
/// genre's movies plus an ordinal revenue rank (rank 1 = highest summed
/// screening revenue; genres with no screenings rank on revenue zero).
pub static GENRE_PERFORMANCE_ANALYSIS: ViewSchema = ViewSchema {
    name: "genre_performance_analysis",
    columns: &[
        "genre_id",
        "genre_name",
        "avg_imdb_rating",
        "avg_rotten_tomatoes",
        "avg_metacritic",
        "revenue_rank",
    ],
    depends_on: &["genres", "movies", "screenings"],
    select_sql: "\
SELECT g.genre_id,
       g.genre_name,
       r.avg_imdb_rating,
       r.avg_rotten_tomatoes,
       r.avg_metacritic,
       RANK() OVER (ORDER BY COALESCE(rev.genre_revenue, 0.0) DESC) AS revenue_rank
  FROM genres g
  JOIN (SELECT genre_id,
               AVG(imdb_rating) AS avg_imdb_rating,
               AVG(rotten_tomatoes) AS avg_rotten_tomatoes,
               AVG(metacritic) AS avg_metacritic
          FROM movies
         GROUP BY genre_id) r ON r.genre_id = g.genre_id
  LEFT JOIN (SELECT m.genre_id,
                    SUM(s.revenue) AS genre_revenue
               FROM screenings s
               JOIN movies m ON m.movie_id = s.movie_id
              GROUP BY m.genre_id) rev ON rev.genre_id = g.genre_id",
};

/// All derived views, in creation order
pub static ALL_VIEWS: &[&ViewSchema] = &[
    &MOVIE_GENRE_RATINGS,
    &POPULAR_SCREENING_TIMES,
    &MONTHLY_MOVIE_PERFORMANCE,
    &THEATER_SALES_ANALYSIS,
    &GENRE_PERFORMANCE_ANALYSIS,
];

/// Get view schema by name
pub fn get_view(name: &str) -> Option<&'static ViewSchema> {
    ALL_VIEWS.iter().find(|v| v.name == name).copied()
}

/// Get all view names
pub fn view_names() -> Vec<&'static str> {
    ALL_VIEWS.iter().map(|v| v.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::get_table;

    #[test]
    fn test_view_dependencies_are_known_tables() {
        for view in ALL_VIEWS {
            for dep in view.depends_on {
                assert!(
                    get_table(dep).is_some(),
                    "view '{}' depends on unknown table '{}'",
                    view.name,
                    dep
                );
            }
        }
    }

    #[test]
    fn test_get_view() {
        assert!(get_view("movie_genre_ratings").is_some());
        assert!(get_view("no_such_view").is_none());
    }
}
