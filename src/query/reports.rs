//! Fixed catalog of analytics functions over the derived views.
//!
//! One free function per report, each checking a connection out of the
//! store's pool, building one parameterized query, and returning typed
//! rows. Out-of-domain filter values (an unknown genre, an hour range
//! nothing falls into) yield empty Vecs, not errors.

use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::Serialize;

use crate::error::Result;
use crate::query::builder::{Filter, SelectQuery, SortOrder};
use crate::schema::views::{
    GENRE_PERFORMANCE_ANALYSIS, MONTHLY_MOVIE_PERFORMANCE, MOVIE_GENRE_RATINGS,
    POPULAR_SCREENING_TIMES, THEATER_SALES_ANALYSIS,
};
use crate::store::Store;

/// Default row cap for `top_movies_by_genre_and_year`.
pub const DEFAULT_TOP_MOVIES: u32 = 10;
/// Default row cap for `theaters_revenue`.
pub const DEFAULT_TOP_THEATERS: u32 = 5;
/// Default row cap for `top_revenue_movies`.
pub const DEFAULT_TOP_REVENUE: u32 = 10;
/// Hour-of-day span covering every possible screening time.
pub const FULL_HOUR_RANGE: (i64, i64) = (0, 23);
/// Calendar-month span covering the whole year.
pub const FULL_MONTH_RANGE: (i64, i64) = (1, 12);

/// A ranked movie with its blended rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMovie {
    pub movie_title: String,
    pub genre_name: String,
    pub release_year: i64,
    pub combined_rating: f64,
}

/// Screening and ticket totals for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningHour {
    pub hour: i64,
    pub total_screenings: i64,
    pub total_tickets_sold: i64,
}

/// Revenue and ticket totals for one calendar month, summed across years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySales {
    pub month: i64,
    pub revenue: f64,
    pub tickets_sold: i64,
}

/// A theater with its summed screening revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheaterRevenue {
    pub theater_name: String,
    pub total_revenue: f64,
}

/// Per-genre rating averages plus the genre's revenue rank (1 = highest
/// summed screening revenue).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRating {
    pub genre_name: String,
    pub avg_imdb_rating: f64,
    pub avg_rotten_tomatoes: f64,
    pub avg_metacritic: f64,
    pub revenue_rank: i64,
}

/// A movie ranked by its summed screening revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueMovie {
    pub movie_title: String,
    pub genre_name: String,
    pub release_year: i64,
    pub revenue: f64,
}

/// Inclusive release-year span of the movies on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSpan {
    pub min_year: i64,
    pub max_year: i64,
}

/// Distinct genre names that have at least one movie, alphabetical.
pub fn list_genres(store: &Store) -> Result<Vec<String>> {
    let conn = store.conn()?;
    SelectQuery::from_view(&MOVIE_GENRE_RATINGS)
        .columns(&["genre_name"])
        .distinct()
        .order_by("genre_name", SortOrder::Ascending)
        .run(&conn, |row| row.get(0))
}

/// Minimum and maximum release year on record, or `None` for a store
/// with no movies.
pub fn year_range(store: &Store) -> Result<Option<YearSpan>> {
    let conn = store.conn()?;
    let (min, max) = conn.query_row(
        "SELECT MIN(release_year), MAX(release_year) FROM movie_genre_ratings",
        [],
        |row| {
            Ok((
                row.get::<_, Option<i64>>(0)?,
                row.get::<_, Option<i64>>(1)?,
            ))
        },
    )?;
    Ok(min
        .zip(max)
        .map(|(min_year, max_year)| YearSpan { min_year, max_year }))
}

/// Top `top_n` movies of one genre within an inclusive release-year span,
/// best combined rating first. Ties on rating break toward the lower
/// movie id. `min_rating: None` applies no rating floor at all.
pub fn top_movies_by_genre_and_year(
    store: &Store,
    genre: &str,
    years: (i64, i64),
    top_n: u32,
    min_rating: Option<f64>,
) -> Result<Vec<TopMovie>> {
    let conn = store.conn()?;
    let mut query = SelectQuery::from_view(&MOVIE_GENRE_RATINGS)
        .columns(&[
            "movie_title",
            "genre_name",
            "release_year",
            "combined_rating",
        ])
        .filter(Filter::Equals {
            column: "genre_name",
            value: Value::Text(genre.to_owned()),
        })
        .filter(Filter::Between {
            column: "release_year",
            low: Value::Integer(years.0),
            high: Value::Integer(years.1),
        });
    if let Some(min_rating) = min_rating {
        query = query.filter(Filter::AtLeast {
            column: "combined_rating",
            value: Value::Real(min_rating),
        });
    }
    query
        .order_by("combined_rating", SortOrder::Descending)
        .order_by("movie_id", SortOrder::Ascending)
        .limit(top_n)
        .run(&conn, |row| {
            Ok(TopMovie {
                movie_title: row.get(0)?,
                genre_name: row.get(1)?,
                release_year: row.get(2)?,
                combined_rating: row.get(3)?,
            })
        })
}

/// Screening and ticket totals per hour of day, restricted to the
/// inclusive `hours` span, earliest hour first.
pub fn screening_times_by_hour(store: &Store, hours: (i64, i64)) -> Result<Vec<ScreeningHour>> {
    let conn = store.conn()?;
    SelectQuery::from_view(&POPULAR_SCREENING_TIMES)
        .filter(Filter::Between {
            column: "hour",
            low: Value::Integer(hours.0),
            high: Value::Integer(hours.1),
        })
        .order_by("hour", SortOrder::Ascending)
        .run(&conn, |row| {
            Ok(ScreeningHour {
                hour: row.get(0)?,
                total_screenings: row.get(1)?,
                total_tickets_sold: row.get(2)?,
            })
        })
}

/// Revenue and ticket totals per calendar month, restricted to the
/// inclusive `months` span, January first.
pub fn monthly_sales(store: &Store, months: (i64, i64)) -> Result<Vec<MonthlySales>> {
    let conn = store.conn()?;
    SelectQuery::from_view(&MONTHLY_MOVIE_PERFORMANCE)
        .filter(Filter::Between {
            column: "month",
            low: Value::Integer(months.0),
            high: Value::Integer(months.1),
        })
        .order_by("month", SortOrder::Ascending)
        .run(&conn, |row| {
            Ok(MonthlySales {
                month: row.get(0)?,
                revenue: row.get(1)?,
                tickets_sold: row.get(2)?,
            })
        })
}

/// Top `top_n` theaters by summed screening revenue, highest first.
/// Theaters with no screenings count as zero revenue; ties break toward
/// the lower theater id.
pub fn theaters_revenue(store: &Store, top_n: u32) -> Result<Vec<TheaterRevenue>> {
    let conn = store.conn()?;
    SelectQuery::from_view(&THEATER_SALES_ANALYSIS)
        .columns(&["theater_name", "total_revenue"])
        .order_by("total_revenue", SortOrder::Descending)
        .order_by("theater_id", SortOrder::Ascending)
        .limit(top_n)
        .run(&conn, |row| {
            Ok(TheaterRevenue {
                theater_name: row.get(0)?,
                total_revenue: row.get(1)?,
            })
        })
}

/// Average rating sources per genre, best-earning genre first. Only
/// genres with at least one movie appear.
pub fn genre_ratings(store: &Store) -> Result<Vec<GenreRating>> {
    let conn = store.conn()?;
    SelectQuery::from_view(&GENRE_PERFORMANCE_ANALYSIS)
        .columns(&[
            "genre_name",
            "avg_imdb_rating",
            "avg_rotten_tomatoes",
            "avg_metacritic",
            "revenue_rank",
        ])
        .order_by("revenue_rank", SortOrder::Ascending)
        .order_by("genre_name", SortOrder::Ascending)
        .run(&conn, |row| {
            Ok(GenreRating {
                genre_name: row.get(0)?,
                avg_imdb_rating: row.get(1)?,
                avg_rotten_tomatoes: row.get(2)?,
                avg_metacritic: row.get(3)?,
                revenue_rank: row.get(4)?,
            })
        })
}

/// Distinct genre names present in the genre performance view,
/// alphabetical.
pub fn list_genre_names_for_ratings(store: &Store) -> Result<Vec<String>> {
    let conn = store.conn()?;
    SelectQuery::from_view(&GENRE_PERFORMANCE_ANALYSIS)
        .columns(&["genre_name"])
        .distinct()
        .order_by("genre_name", SortOrder::Ascending)
        .run(&conn, |row| row.get(0))
}

/// Top `top_n` movies by summed screening revenue, optionally restricted
/// to an inclusive release-year span. Ties break by title, then year.
///
/// This one aggregates over the base tables rather than a view: revenue
/// per movie is not part of the view catalog.
pub fn top_revenue_movies(
    store: &Store,
    years: Option<(i64, i64)>,
    top_n: u32,
) -> Result<Vec<RevenueMovie>> {
    let conn = store.conn()?;
    let mut sql = String::from(
        "SELECT m.movie_title, g.genre_name, m.release_year, SUM(s.revenue) AS revenue \
           FROM screenings s \
           JOIN movies m ON m.movie_id = s.movie_id \
           JOIN genres g ON g.genre_id = m.genre_id",
    );
    let mut params: Vec<Value> = Vec::new();
    if let Some((low, high)) = years {
        sql.push_str(" WHERE m.release_year BETWEEN ? AND ?");
        params.push(Value::Integer(low));
        params.push(Value::Integer(high));
    }
    sql.push_str(
        " GROUP BY m.movie_title, g.genre_name, m.release_year \
          ORDER BY revenue DESC, m.movie_title ASC, m.release_year ASC LIMIT ?",
    );
    params.push(Value::Integer(i64::from(top_n)));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params), |row| {
            Ok(RevenueMovie {
                movie_title: row.get(0)?,
                genre_name: row.get(1)?,
                release_year: row.get(2)?,
                revenue: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}
