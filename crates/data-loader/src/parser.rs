//! Parser for MovieLens data files.
//!
//! - movies.dat: movieId::title::genres
//! - ratings.dat: userId::movieId::rating::timestamp
//!
//! The file-level functions read and decode the file, then hand the text to
//! `parse_movies_str` / `parse_ratings_str`, which do the actual work and can
//! be exercised without touching the filesystem.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const FIELD_SEPARATOR: &str = "::";

/// Read a file with ISO-8859-1 encoding (Latin-1)
///
/// The MovieLens dataset uses ISO-8859-1, not UTF-8. Every Latin-1 byte maps
/// directly to the Unicode code point of the same value.
fn read_latin1(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Pull the next `::`-separated field or report which one is missing
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

/// Parse a field into a number, keeping file/line context on failure
fn parse_number<T>(value: &str, file: &str, line: usize, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

/// Parse the movies.dat file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let content = read_latin1(path)?;
    parse_movies_str(&content, "movies.dat")
}

/// Parse movie rows from already-decoded text.
///
/// Genres are pipe-separated ("Animation|Children's|Comedy"); empty labels
/// are dropped, so a movie may end up with no genres at all. A movie id may
/// appear only once.
pub fn parse_movies_str(content: &str, file: &str) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();
    let mut seen: HashSet<MovieId> = HashSet::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split(FIELD_SEPARATOR);
        let movie_id = next_field(&mut parts, file, line_no, "movieId")?;
        let title = next_field(&mut parts, file, line_no, "title")?;
        let genres = next_field(&mut parts, file, line_no, "genres")?;

        let extra = parts.count();
        if extra > 0 {
            return Err(DataLoadError::FieldCountMismatch {
                expected: 3,
                found: 3 + extra,
                line: line_no,
            });
        }

        let id: MovieId = parse_number(movie_id, file, line_no, "movieId")?;
        if !seen.insert(id) {
            return Err(DataLoadError::ValidationError(format!(
                "duplicate movieId {} at line {} in {}",
                id, line_no, file
            )));
        }

        movies.push(Movie {
            id,
            title: title.trim().to_string(),
            genres: parse_genres(genres),
        });
    }

    Ok(movies)
}

/// Parse the ratings.dat file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let content = read_latin1(path)?;
    parse_ratings_str(&content, "ratings.dat")
}

/// Parse rating rows from already-decoded text.
///
/// The timestamp column must be present and numeric but is otherwise unused.
pub fn parse_ratings_str(content: &str, file: &str) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split(FIELD_SEPARATOR);
        let user_id = next_field(&mut parts, file, line_no, "userId")?;
        let movie_id = next_field(&mut parts, file, line_no, "movieId")?;
        let rating_value = next_field(&mut parts, file, line_no, "rating")?;
        let timestamp = next_field(&mut parts, file, line_no, "timestamp")?;
        let _: i64 = parse_number(timestamp, file, line_no, "timestamp")?;

        ratings.push(Rating {
            user_id: parse_number(user_id, file, line_no, "userId")?,
            movie_id: parse_number(movie_id, file, line_no, "movieId")?,
            rating: parse_number(rating_value, file, line_no, "rating")?,
        });
    }

    Ok(ratings)
}

/// Split a pipe-separated genre list
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
