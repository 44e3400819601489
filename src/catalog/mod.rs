use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::TrackRecord;

/// Ordered collection of track records.
///
/// The static catalog is loaded once at startup and shared read-only across
/// requests; per-request working tables are plain `Vec<TrackRecord>` built
/// by the merger.
#[derive(Debug, Clone, Default)]
pub struct CatalogTable {
    tracks: Vec<TrackRecord>,
}

impl CatalogTable {
    pub fn new(tracks: Vec<TrackRecord>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// One row of the catalog file.
///
/// The file carries the genre column under its legacy name and the artist
/// column pluralized; both are aligned to the `TrackRecord` schema here so
/// the rest of the pipeline never sees the file's column names.
#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    #[serde(alias = "artists")]
    artist: String,
    #[serde(rename = "consolidated_genres")]
    genres: Vec<String>,
    tempo: f64,
    valence: f64,
    energy: f64,
    danceability: f64,
    acousticness: f64,
    speechiness: f64,
    instrumentalness: f64,
    popularity: f64,
    release_year: i32,
    #[serde(default)]
    duration_min: f64,
}

impl From<CatalogRow> for TrackRecord {
    fn from(row: CatalogRow) -> Self {
        TrackRecord {
            id: row.id,
            name: row.name,
            artist: row.artist,
            genres: row.genres,
            tempo: row.tempo,
            valence: row.valence,
            energy: row.energy,
            danceability: row.danceability,
            acousticness: row.acousticness,
            speechiness: row.speechiness,
            instrumentalness: row.instrumentalness,
            popularity: row.popularity,
            release_year: row.release_year,
            duration_min: row.duration_min,
        }
    }
}

/// Loads the static catalog from a JSON file at process start.
///
/// Any failure here is a startup-class `DataIntegrity` error: the process
/// refuses to start rather than serve requests against a broken catalog.
pub fn load_catalog(path: &str) -> AppResult<CatalogTable> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::DataIntegrity(format!("Failed to read catalog file {}: {}", path, e))
    })?;

    let rows: Vec<CatalogRow> = serde_json::from_str(&raw).map_err(|e| {
        AppError::DataIntegrity(format!("Failed to parse catalog file {}: {}", path, e))
    })?;

    if rows.is_empty() {
        return Err(AppError::DataIntegrity(format!(
            "Catalog file {} contains no tracks",
            path
        )));
    }

    let table = CatalogTable::new(rows.into_iter().map(TrackRecord::from).collect());

    tracing::info!(tracks = table.len(), path = %path, "Static catalog loaded");

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_catalog_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_catalog_valid_file() {
        let file = write_catalog_file(
            r#"[{
                "id": "t1",
                "name": "Karma Police",
                "artists": "Radiohead",
                "consolidated_genres": ["art_rock", "alternative_rock"],
                "tempo": 74.8,
                "valence": 0.32,
                "energy": 0.54,
                "danceability": 0.36,
                "acousticness": 0.06,
                "speechiness": 0.03,
                "instrumentalness": 0.0002,
                "popularity": 78.0,
                "release_year": 1997,
                "duration_min": 4.4
            }]"#,
        );

        let table = load_catalog(file.path().to_str().unwrap()).unwrap();
        assert_eq!(table.len(), 1);

        let track = &table.tracks()[0];
        assert_eq!(track.id, "t1");
        assert_eq!(track.artist, "Radiohead");
        assert_eq!(track.genres, vec!["art_rock", "alternative_rock"]);
        assert_eq!(track.release_year, 1997);
    }

    #[test]
    fn test_load_catalog_empty_array_is_data_integrity_error() {
        let file = write_catalog_file("[]");
        let result = load_catalog(file.path().to_str().unwrap());
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }

    #[test]
    fn test_load_catalog_missing_file_is_data_integrity_error() {
        let result = load_catalog("/nonexistent/path/catalog.json");
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }

    #[test]
    fn test_load_catalog_malformed_json_is_data_integrity_error() {
        let file = write_catalog_file("{not json");
        let result = load_catalog(file.path().to_str().unwrap());
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }

    #[test]
    fn test_load_catalog_missing_required_column_is_data_integrity_error() {
        // No tempo column
        let file = write_catalog_file(
            r#"[{
                "id": "t1",
                "name": "Song",
                "artists": "Artist",
                "consolidated_genres": [],
                "valence": 0.3,
                "energy": 0.5,
                "danceability": 0.4,
                "acousticness": 0.1,
                "speechiness": 0.05,
                "instrumentalness": 0.0,
                "popularity": 50.0,
                "release_year": 2001
            }]"#,
        );

        let result = load_catalog(file.path().to_str().unwrap());
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }
}
