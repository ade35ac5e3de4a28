//! Per-field similarity functions
//!
//! All functions return a similarity in [0.0, 1.0] where 1.0 means identical.

use ahash::AHashSet;

/// How two field values are compared
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Character trigram Jaccard, for noisy text
    #[default]
    Fuzzy,
    /// Case-insensitive equality
    Exact,
    /// Whitespace token Jaccard
    Overlap,
    /// 1 - |a - b| / max(|a|, |b|)
    Relative,
    /// exp(-|a - b| / scale), scale adapting to the magnitudes
    Absolute,
}

pub fn text_similarity(a: &str, b: &str, method: Comparison) -> f32 {
    match method {
        Comparison::Exact => exact(a, b),
        Comparison::Overlap => token_jaccard(a, b),
        _ => trigram_jaccard(a, b),
    }
}

pub fn number_similarity(a: f64, b: f64, method: Comparison) -> f32 {
    match method {
        Comparison::Exact => {
            if (a - b).abs() < f64::EPSILON {
                1.0
            } else {
                0.0
            }
        }
        Comparison::Absolute => {
            let scale = (a.abs() + b.abs() + 1.0) / 2.0;
            (-(a - b).abs() / scale).exp() as f32
        }
        _ => {
            let max = a.abs().max(b.abs());
            if max == 0.0 {
                1.0
            } else {
                (1.0 - (a - b).abs() / max).max(0.0) as f32
            }
        }
    }
}

pub fn categorical_similarity(a: &str, b: &str, method: Comparison) -> f32 {
    match method {
        Comparison::Overlap => token_jaccard(a, b),
        _ => exact(a, b),
    }
}

pub fn boolean_similarity(a: bool, b: bool) -> f32 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

fn exact(a: &str, b: &str) -> f32 {
    if a.eq_ignore_ascii_case(b) {
        1.0
    } else {
        0.0
    }
}

fn jaccard<T: Eq + std::hash::Hash>(a: &AHashSet<T>, b: &AHashSet<T>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f32 / union as f32
}

fn token_jaccard(a: &str, b: &str) -> f32 {
    let tokens = |s: &str| -> AHashSet<String> {
        s.split_whitespace().map(str::to_lowercase).collect()
    };
    jaccard(&tokens(a), &tokens(b))
}

fn trigram_jaccard(a: &str, b: &str) -> f32 {
    let ta = trigrams(&a.to_lowercase());
    let tb = trigrams(&b.to_lowercase());
    if ta.is_empty() != tb.is_empty() {
        return 0.0;
    }
    jaccard(&ta, &tb)
}

/// Character trigrams of `s` padded with two spaces on each side
fn trigrams(s: &str) -> AHashSet<String> {
    if s.is_empty() {
        return AHashSet::new();
    }
    let chars: Vec<char> = format!("  {}  ", s).chars().collect();
    chars.windows(3).map(|w| w.iter().collect()).collect()
}
