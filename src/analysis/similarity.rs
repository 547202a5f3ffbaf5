// Pairwise cosine similarity over a batch of embeddings.
//
// The matrix is computed from the upper triangle and mirrored, so
// M[i][j] == M[j][i] holds bit-for-bit. The diagonal is pinned to 1.0.
//
// Zero-magnitude vectors have no direction. Rather than letting NaN leak
// into the JSON response, a zero vector is treated as identical to itself
// (1.0) and unrelated to everything else (0.0).

/// Euclidean norm of a vector.
fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity given precomputed magnitudes.
fn cosine_with_norms(a: &[f64], b: &[f64], norm_a: f64, norm_b: f64) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let a_zero = norm_a < f64::EPSILON;
    let b_zero = norm_b < f64::EPSILON;
    if a_zero && b_zero {
        return 1.0;
    }
    if a_zero || b_zero {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Cosine similarity between two embedding vectors, in [-1, 1].
///
/// Unlike a topic-overlap score this is not clamped at zero: opposite
/// directions come back negative, which matters when callers pass a
/// negative threshold.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    cosine_with_norms(a, b, magnitude(a), magnitude(b))
}

/// Build the N×N cosine similarity matrix for a batch of embeddings.
///
/// Returns an empty matrix when fewer than two embeddings are given,
/// since no pair exists to compare.
pub fn similarity_matrix(embeddings: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = embeddings.len();
    if n < 2 {
        return Vec::new();
    }

    let norms: Vec<f64> = embeddings.iter().map(|v| magnitude(v)).collect();
    let mut matrix = vec![vec![0.0_f64; n]; n];

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let sim = cosine_with_norms(&embeddings[i], &embeddings[j], norms[i], norms[j]);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        let a = vec![1.0, 0.0];
        let b = vec![-2.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_proportional() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_zero_vector_with_itself() {
        let z = vec![0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&z, &z), 1.0);
    }

    #[test]
    fn test_cosine_zero_vector_with_other() {
        let z = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&z, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &z), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_dimensions() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_matrix_empty_for_fewer_than_two() {
        assert!(similarity_matrix(&[]).is_empty());
        assert!(similarity_matrix(&[vec![1.0, 0.0]]).is_empty());
    }

    #[test]
    fn test_matrix_shape_and_diagonal() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let m = similarity_matrix(&embeddings);
        assert_eq!(m.len(), 3);
        for (i, row) in m.iter().enumerate() {
            assert_eq!(row.len(), 3);
            assert_eq!(row[i], 1.0);
        }
        assert!((m[0][2] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_matrix_zero_vector_row() {
        let embeddings = vec![vec![0.0, 0.0], vec![3.0, 4.0]];
        let m = similarity_matrix(&embeddings);
        assert_eq!(m[0][0], 1.0);
        assert_eq!(m[0][1], 0.0);
        assert!(m.iter().flatten().all(|v| !v.is_nan()));
    }
}
