//! Goal drift detection (§4.3).
//!
//! Open Question resolution: the fallback without an embedder is never a
//! no-op. `lexical_similarity` is the base path and always runs; an
//! embedder, when available on the `InferenceKit`, replaces the similarity
//! metric but `detect_drift` itself always returns a real score either way.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftResult {
    pub similarity: f64,
    pub drift: f64,
    pub is_drifting: bool,
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Token-Jaccard overlap between two texts. Used whenever an embedder is
/// unavailable, and the only metric used otherwise.
pub fn lexical_similarity(a: &str, b: &str) -> f64 {
    let ta = tokenize(a);
    let tb = tokenize(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Cosine similarity between two equal-length embedding vectors.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

fn mean_embedding(vectors: &[Vec<f64>]) -> Option<Vec<f64>> {
    let first = vectors.first()?;
    let dim = first.len();
    let mut mean = vec![0.0; dim];
    for v in vectors {
        for (m, x) in mean.iter_mut().zip(v) {
            *m += x;
        }
    }
    let n = vectors.len() as f64;
    for m in mean.iter_mut() {
        *m /= n;
    }
    Some(mean)
}

/// Detect goal drift between the objective and the recent outputs.
///
/// `embeddings`, when `Some`, is `(objective_embedding, recent_output_embeddings)`
/// and takes priority; otherwise falls back to lexical overlap between the
/// objective text and the concatenated recent outputs.
pub fn detect_drift(
    objective_text: &str,
    recent_outputs: &[String],
    embeddings: Option<(&[f64], &[Vec<f64>])>,
    threshold: f64,
) -> DriftResult {
    let similarity = match embeddings {
        Some((objective_vec, output_vecs)) if !output_vecs.is_empty() => {
            match mean_embedding(output_vecs) {
                Some(mean) => cosine_similarity(objective_vec, &mean),
                None => lexical_fallback(objective_text, recent_outputs),
            }
        }
        _ => lexical_fallback(objective_text, recent_outputs),
    };

    let drift = 1.0 - similarity;
    DriftResult {
        similarity,
        drift,
        is_drifting: similarity < threshold,
    }
}

fn lexical_fallback(objective_text: &str, recent_outputs: &[String]) -> f64 {
    if recent_outputs.is_empty() {
        return 1.0;
    }
    let combined = recent_outputs.join(" ");
    lexical_similarity(objective_text, &combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_fallback_runs_without_embedder() {
        let result = detect_drift(
            "summarize the quarterly report",
            &["the quarterly report summary follows".to_string()],
            None,
            0.5,
        );
        assert!(result.similarity > 0.0);
        assert!(!result.is_drifting);
    }

    #[test]
    fn unrelated_outputs_drift() {
        let result = detect_drift(
            "summarize the quarterly report",
            &["here is a recipe for banana bread".to_string()],
            None,
            0.5,
        );
        assert!(result.is_drifting);
    }

    #[test]
    fn embedder_path_used_when_available() {
        let objective = vec![1.0, 0.0];
        let outputs = vec![vec![1.0, 0.0]];
        let result = detect_drift("x", &["y".to_string()], Some((&objective, &outputs)), 0.5);
        assert!((result.similarity - 1.0).abs() < 1e-9);
    }
}
