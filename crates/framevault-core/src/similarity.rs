//! Cosine similarity over f32 vectors.

/// Cosine similarity of two vectors: `dot(a,b) / (|a| * |b|)`.
///
/// Returns 0.0 when either vector has zero magnitude; stored vectors are
/// not assumed normalized. Vectors of different lengths compare over the
/// shorter prefix, which only arises if a store's dimension invariant was
/// bypassed.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a > 0.0 && mag_b > 0.0 {
        dot / (mag_a * mag_b)
    } else {
        0.0
    }
}
