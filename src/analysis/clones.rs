// Clone detection: threshold filter over the similarity matrix.
//
// Only the upper triangle is read. The threshold comparison uses the raw
// matrix value; rounding to 4 decimals happens when the pair is recorded.

use serde::{Deserialize, Serialize};

/// A pair of texts whose similarity met the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClonePair {
    pub text1_index: usize,
    pub text2_index: usize,
    /// Cosine similarity rounded to 4 decimal places.
    pub similarity: f64,
}

/// Round to `places` decimal places, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Enumerate every (i, j) with i < j and `matrix[i][j] >= threshold`.
///
/// Pairs come out in ascending (i, j) order. The threshold is not range
/// checked: anything above 1.0 yields no pairs, anything at or below -1.0
/// yields all of them.
pub fn detect_clones(matrix: &[Vec<f64>], threshold: f64) -> Vec<ClonePair> {
    let n = matrix.len();
    let mut clones = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let similarity = matrix[i][j];
            if similarity >= threshold {
                clones.push(ClonePair {
                    text1_index: i,
                    text2_index: j,
                    similarity: round_to(similarity, 4),
                });
            }
        }
    }

    clones
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 0.95, 0.2, 0.81],
            vec![0.95, 1.0, 0.8, 0.1],
            vec![0.2, 0.8, 1.0, 0.5],
            vec![0.81, 0.1, 0.5, 1.0],
        ]
    }

    #[test]
    fn test_detects_pairs_at_or_above_threshold() {
        let clones = detect_clones(&sample_matrix(), 0.8);
        let pairs: Vec<(usize, usize)> = clones
            .iter()
            .map(|c| (c.text1_index, c.text2_index))
            .collect();
        // 0.8 exactly is included
        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 2)]);
    }

    #[test]
    fn test_empty_matrix_yields_nothing() {
        assert!(detect_clones(&[], 0.5).is_empty());
        assert!(detect_clones(&[vec![1.0]], -5.0).is_empty());
    }

    #[test]
    fn test_threshold_above_one_yields_nothing() {
        assert!(detect_clones(&sample_matrix(), 1.5).is_empty());
    }

    #[test]
    fn test_threshold_below_minus_one_yields_all_pairs() {
        let clones = detect_clones(&sample_matrix(), -2.0);
        assert_eq!(clones.len(), 6);
    }

    #[test]
    fn test_similarity_rounded_after_comparison() {
        // 0.79996 rounds to 0.8 but is below the threshold before rounding
        let m = vec![vec![1.0, 0.79996], vec![0.79996, 1.0]];
        assert!(detect_clones(&m, 0.8).is_empty());

        let m = vec![vec![1.0, 0.876_543_21], vec![0.876_543_21, 1.0]];
        let clones = detect_clones(&m, 0.8);
        assert_eq!(clones[0].similarity, 0.8765);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123_456, 4), 0.1235);
        assert_eq!(round_to(1.234_56, 3), 1.235);
        assert_eq!(round_to(-0.333_33, 2), -0.33);
    }
}
