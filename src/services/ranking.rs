use std::cmp::Ordering;

use crate::{
    error::{AppError, AppResult},
    models::ScoredTrack,
    services::features::{FeatureMatrix, FeatureRow},
};

/// Maximum number of recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Ranks catalog rows by cosine similarity to the user's row.
///
/// Splits the matrix into the user row (must resolve to exactly one) and
/// catalog rows, scores every catalog row, sorts descending with a stable
/// sort so tied scores keep their pre-sort relative order, and truncates
/// to the top 10. A catalog shorter than 10 rows is returned whole.
pub fn rank_by_similarity(matrix: &FeatureMatrix, user_id: &str) -> AppResult<Vec<ScoredTrack>> {
    let (user_rows, catalog_rows): (Vec<&FeatureRow>, Vec<&FeatureRow>) =
        matrix.rows.iter().partition(|row| row.id == user_id);

    if user_rows.len() != 1 {
        return Err(AppError::DataIntegrity(format!(
            "Expected exactly one feature row for track {}, found {}",
            user_id,
            user_rows.len()
        )));
    }
    let user_row = user_rows[0];

    let mut scored: Vec<ScoredTrack> = catalog_rows
        .iter()
        .map(|row| ScoredTrack {
            id: row.id.clone(),
            score: cosine_similarity(&user_row.values, &row.values),
        })
        .collect();

    // Vec::sort_by is stable, ties preserve catalog order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(MAX_RECOMMENDATIONS);

    tracing::debug!(
        candidates = catalog_rows.len(),
        returned = scored.len(),
        "Similarity ranking completed"
    );

    Ok(scored)
}

/// Cosine similarity between two vectors; a zero-norm vector on either
/// side yields 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::features::FeatureSchema;

    fn matrix_from(rows: Vec<(&str, Vec<f64>)>) -> FeatureMatrix {
        FeatureMatrix {
            schema: FeatureSchema {
                genre_terms: vec![],
                decades: vec![],
            },
            rows: rows
                .into_iter()
                .map(|(id, values)| FeatureRow {
                    id: id.to_string(),
                    values,
                })
                .collect(),
        }
    }

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn test_cosine_similarity_opposite_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_similarity_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_rank_orders_descending() {
        let matrix = matrix_from(vec![
            ("user", vec![1.0, 0.0]),
            ("far", vec![0.0, 1.0]),
            ("near", vec![1.0, 0.1]),
            ("exact", vec![2.0, 0.0]),
        ]);

        let ranked = rank_by_similarity(&matrix, "user").unwrap();
        let ids: Vec<&str> = ranked.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near", "far"]);
    }

    #[test]
    fn test_rank_excludes_user_row() {
        let matrix = matrix_from(vec![
            ("user", vec![1.0, 0.0]),
            ("other", vec![1.0, 0.0]),
        ]);

        let ranked = rank_by_similarity(&matrix, "user").unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "other");
    }

    #[test]
    fn test_rank_ties_preserve_input_order() {
        // b, c and d all have identical vectors, so identical scores; their
        // output order must match their pre-sort order.
        let matrix = matrix_from(vec![
            ("user", vec![1.0, 1.0]),
            ("b", vec![2.0, 2.0]),
            ("c", vec![2.0, 2.0]),
            ("d", vec![2.0, 2.0]),
        ]);

        let ranked = rank_by_similarity(&matrix, "user").unwrap();
        let ids: Vec<&str> = ranked.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_rank_returns_at_most_ten() {
        let mut rows = vec![("user", vec![1.0, 0.0])];
        let ids: Vec<String> = (0..15).map(|i| format!("t{}", i)).collect();
        for id in &ids {
            rows.push((id.as_str(), vec![1.0, 0.5]));
        }

        let matrix = matrix_from(rows);
        let ranked = rank_by_similarity(&matrix, "user").unwrap();
        assert_eq!(ranked.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_rank_short_catalog_returns_all_rows() {
        let matrix = matrix_from(vec![
            ("user", vec![1.0, 0.0]),
            ("a", vec![1.0, 0.1]),
            ("b", vec![0.5, 0.5]),
            ("c", vec![0.0, 1.0]),
        ]);

        let ranked = rank_by_similarity(&matrix, "user").unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_rank_missing_user_row_is_data_integrity_error() {
        let matrix = matrix_from(vec![("a", vec![1.0, 0.0])]);
        let result = rank_by_similarity(&matrix, "user");
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }

    #[test]
    fn test_rank_duplicate_user_row_is_data_integrity_error() {
        let matrix = matrix_from(vec![
            ("user", vec![1.0, 0.0]),
            ("user", vec![0.0, 1.0]),
            ("a", vec![1.0, 0.0]),
        ]);
        let result = rank_by_similarity(&matrix, "user");
        assert!(matches!(result, Err(AppError::DataIntegrity(_))));
    }
}
