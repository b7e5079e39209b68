use anyhow::{bail, Context, Result};
use movie_analytics::{
    cli::{Cli, Commands, OutputFormat},
    query::reports,
    store::{bootstrap, Store, StoreConfig},
};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Init {
            database,
            source_dir,
            force,
        } => {
            if database.exists() {
                if force {
                    fs::remove_file(&database)
                        .with_context(|| format!("failed to remove {:?}", database))?;
                } else {
                    bail!("{:?} already exists (use --force to overwrite)", database);
                }
            }

            let start = Instant::now();

            println!("Loading CSV sources from {:?}...", source_dir);
            let (_store, summary) = bootstrap(&StoreConfig::new(&database), &source_dir)?;

            let elapsed = start.elapsed();
            println!(
                "\nCreated {:?} ({} rows loaded, {} screenings dropped) in {:.1}s",
                database,
                summary.total_inserted(),
                summary.dropped_rows(),
                elapsed.as_secs_f64()
            );
        }

        Commands::TopMovies {
            database,
            genre,
            years,
            top_n,
            min_rating,
        } => {
            let store = open_store(&database)?;
            // No --years means the full span of release years on record
            let span = match parse_span(years, "years")? {
                Some(span) => Some(span),
                None => reports::year_range(&store)?.map(|s| (s.min_year, s.max_year)),
            };
            let rows = match span {
                Some(years) => {
                    reports::top_movies_by_genre_and_year(&store, &genre, years, top_n, min_rating)?
                }
                None => Vec::new(),
            };
            render(
                cli.format,
                &rows,
                &["TITLE", "GENRE", "YEAR", "RATING"],
                |m| {
                    vec![
                        m.movie_title.clone(),
                        m.genre_name.clone(),
                        m.release_year.to_string(),
                        format!("{:.2}", m.combined_rating),
                    ]
                },
            )?;
        }

        Commands::ScreeningTimes { database, hours } => {
            let store = open_store(&database)?;
            let hours = parse_span(hours, "hours")?.unwrap_or(reports::FULL_HOUR_RANGE);
            let rows = reports::screening_times_by_hour(&store, hours)?;
            render(
                cli.format,
                &rows,
                &["HOUR", "SCREENINGS", "TICKETS"],
                |h| {
                    vec![
                        format!("{:02}:00", h.hour),
                        h.total_screenings.to_string(),
                        h.total_tickets_sold.to_string(),
                    ]
                },
            )?;
        }

        Commands::MonthlySales { database, months } => {
            let store = open_store(&database)?;
            let months = parse_span(months, "months")?.unwrap_or(reports::FULL_MONTH_RANGE);
            let rows = reports::monthly_sales(&store, months)?;
            render(
                cli.format,
                &rows,
                &["MONTH", "REVENUE", "TICKETS"],
                |m| {
                    vec![
                        m.month.to_string(),
                        format!("{:.2}", m.revenue),
                        m.tickets_sold.to_string(),
                    ]
                },
            )?;
        }

        Commands::TheatersRevenue { database, top_n } => {
            let store = open_store(&database)?;
            let rows = reports::theaters_revenue(&store, top_n)?;
            render(cli.format, &rows, &["THEATER", "REVENUE"], |t| {
                vec![t.theater_name.clone(), format!("{:.2}", t.total_revenue)]
            })?;
        }

        Commands::GenreRatings { database, genres } => {
            let store = open_store(&database)?;
            let mut rows = reports::genre_ratings(&store)?;
            // The optional subset restriction is client-side, over the
            // already-ranked result
            if let Some(genres) = genres {
                rows.retain(|r| genres.iter().any(|g| g == &r.genre_name));
            }
            render(
                cli.format,
                &rows,
                &["GENRE", "IMDB", "ROTTEN TOMATOES", "METACRITIC", "RANK"],
                |g| {
                    vec![
                        g.genre_name.clone(),
                        format!("{:.2}", g.avg_imdb_rating),
                        format!("{:.1}", g.avg_rotten_tomatoes),
                        format!("{:.1}", g.avg_metacritic),
                        g.revenue_rank.to_string(),
                    ]
                },
            )?;
        }

        Commands::TopRevenue {
            database,
            years,
            top_n,
        } => {
            let store = open_store(&database)?;
            let years = parse_span(years, "years")?;
            let rows = reports::top_revenue_movies(&store, years, top_n)?;
            render(
                cli.format,
                &rows,
                &["TITLE", "GENRE", "YEAR", "REVENUE"],
                |m| {
                    vec![
                        m.movie_title.clone(),
                        m.genre_name.clone(),
                        m.release_year.to_string(),
                        format!("{:.2}", m.revenue),
                    ]
                },
            )?;
        }

        Commands::Genres { database } => {
            let store = open_store(&database)?;
            let names = reports::list_genres(&store)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
                OutputFormat::Table => {
                    println!("Genres:\n");
                    for name in names {
                        println!("  {}", name);
                    }
                }
            }
        }

        Commands::YearRange { database } => {
            let store = open_store(&database)?;
            let span = reports::year_range(&store)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&span)?),
                OutputFormat::Table => match span {
                    Some(span) => println!("{} - {}", span.min_year, span.max_year),
                    None => println!("(no movies on record)"),
                },
            }
        }
    }

    Ok(())
}

fn open_store(database: &Path) -> Result<Store> {
    if !database.exists() {
        bail!("database {:?} does not exist; run 'init' first", database);
    }
    Ok(Store::open(&StoreConfig::new(database))?)
}

/// Turn an optional `--flag A,B` pair into an inclusive span.
fn parse_span(values: Option<Vec<i64>>, flag: &str) -> Result<Option<(i64, i64)>> {
    match values {
        None => Ok(None),
        Some(v) if v.len() == 2 => Ok(Some((v[0], v[1]))),
        Some(v) => bail!(
            "--{} expects exactly two comma-separated values, got {}",
            flag,
            v.len()
        ),
    }
}

fn render<T: Serialize>(
    format: OutputFormat,
    rows: &[T],
    headers: &[&str],
    to_cells: impl Fn(&T) -> Vec<String>,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(no rows)");
            } else {
                print_table(headers, rows.iter().map(to_cells).collect());
            }
        }
    }
    Ok(())
}

fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let header_line = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line);
    println!("{}", "-".repeat(header_line.len()));

    for row in rows {
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
}
