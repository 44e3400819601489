use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::TrackRecord;

/// Audio attribute column order in the feature matrix
pub const AUDIO_COLUMNS: [&str; 8] = [
    "tempo",
    "valence",
    "energy",
    "danceability",
    "acousticness",
    "speechiness",
    "popularity",
    "instrumentalness",
];

/// Audio attributes are the most informative block for similarity
const AUDIO_WEIGHT: f64 = 0.2;
/// Release decade is the least informative block
const DECADE_WEIGHT: f64 = 0.1;

/// Shape of the vocabulary-dependent feature blocks for one request.
///
/// Genre and decade dimensionality depends on which genres and decades
/// appear in the merged table, so the schema is computed per request and
/// threaded alongside the matrix instead of being a fixed layout.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    /// Distinct genre terms, sorted lexicographically
    pub genre_terms: Vec<String>,
    /// Distinct release decades (year / 10), sorted ascending
    pub decades: Vec<i32>,
}

impl FeatureSchema {
    /// Total number of feature columns
    pub fn width(&self) -> usize {
        AUDIO_COLUMNS.len() + self.genre_terms.len() + self.decades.len()
    }
}

/// One track's feature vector with its identifier carried as a label
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub id: String,
    pub values: Vec<f64>,
}

/// Per-request feature matrix over the merged working table
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub schema: FeatureSchema,
    pub rows: Vec<FeatureRow>,
}

/// Builds the feature matrix for the merged working table.
///
/// Column layout per row: weighted audio attributes (tempo min-max scaled,
/// popularity divided by 100, the rest already in [0,1]), then genre TF-IDF,
/// then the weighted decade one-hot block.
pub fn build_feature_matrix(tracks: &[TrackRecord]) -> FeatureMatrix {
    let schema = build_schema(tracks);

    let tempo_scaled = min_max_scale(&tracks.iter().map(|t| t.tempo).collect::<Vec<_>>());
    let genre_rows = tf_idf_rows(tracks, &schema.genre_terms);

    let rows = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let mut values = Vec::with_capacity(schema.width());

            let audio = [
                tempo_scaled[i],
                track.valence,
                track.energy,
                track.danceability,
                track.acousticness,
                track.speechiness,
                track.popularity / 100.0,
                track.instrumentalness,
            ];
            values.extend(audio.iter().map(|v| v * AUDIO_WEIGHT));

            values.extend(&genre_rows[i]);

            let decade = track.release_year / 10;
            for d in &schema.decades {
                values.push(if *d == decade { DECADE_WEIGHT } else { 0.0 });
            }

            FeatureRow {
                id: track.id.clone(),
                values,
            }
        })
        .collect();

    FeatureMatrix { schema, rows }
}

/// Computes the vocabulary-dependent schema for a working table
fn build_schema(tracks: &[TrackRecord]) -> FeatureSchema {
    let mut genre_terms = BTreeSet::new();
    let mut decades = BTreeSet::new();

    for track in tracks {
        for term in tokenize(&track.genres.join(" ")) {
            genre_terms.insert(term);
        }
        decades.insert(track.release_year / 10);
    }

    FeatureSchema {
        genre_terms: genre_terms.into_iter().collect(),
        decades: decades.into_iter().collect(),
    }
}

/// Min-max scales a column to [0,1].
///
/// A constant column (max == min) scales to all zeros instead of dividing
/// by zero.
pub fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range == 0.0 || !range.is_finite() {
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| (v - min) / range).collect()
}

/// Lowercases and splits into tokens of two or more word characters.
/// Underscore counts as a word character, so "hip_hop" stays one term.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_string())
        .collect()
}

/// TF-IDF rows over each track's joined genre string.
///
/// Raw term counts, smoothed IDF `ln((1+n)/(1+df)) + 1`, L2-normalized
/// rows. A track with no genre terms gets an all-zero row.
fn tf_idf_rows(tracks: &[TrackRecord], terms: &[String]) -> Vec<Vec<f64>> {
    let docs: Vec<Vec<String>> = tracks
        .iter()
        .map(|t| tokenize(&t.genres.join(" ")))
        .collect();

    let n = docs.len() as f64;

    let mut df: HashMap<&str, usize> = HashMap::new();
    for doc in &docs {
        let unique: HashSet<&str> = doc.iter().map(|t| t.as_str()).collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    let idf: Vec<f64> = terms
        .iter()
        .map(|term| {
            let df = df.get(term.as_str()).copied().unwrap_or(0) as f64;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    docs.iter()
        .map(|doc| {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for token in doc {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }

            let mut row: Vec<f64> = terms
                .iter()
                .zip(&idf)
                .map(|(term, idf)| {
                    counts.get(term.as_str()).copied().unwrap_or(0) as f64 * idf
                })
                .collect();

            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in &mut row {
                    *v /= norm;
                }
            }

            row
        })
        .collect()
}
