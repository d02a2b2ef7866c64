use std::collections::HashMap;

pub const TRIGRAM_LEN: usize = 3;

/// Sparse vector of trigram weights. Raw occurrence counts after
/// [`build_trigram_profile`], unit magnitudes after [`normalize_trigram_profile`].
pub type TrigramProfile = HashMap<String, f32>;

/// Builds a trigram profile from the lines of a text.
///
/// Windows are taken over code points, so a trigram is always three
/// characters regardless of how many bytes each one encodes to.
pub fn build_trigram_profile<S: AsRef<str>>(text: &[S]) -> TrigramProfile {
    let mut profile = TrigramProfile::new();

    for line in text {
        let line = strip_line(line.as_ref());
        if line.is_empty() {
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        if chars.len() < TRIGRAM_LEN {
            continue;
        }

        for window in chars.windows(TRIGRAM_LEN) {
            let trigram: String = window.iter().collect();
            *profile.entry(trigram).or_insert(0.0) += 1.0;
        }
    }

    profile
}

/// Rescales a profile to unit L2 norm. A zero-norm profile comes back unchanged.
pub fn normalize_trigram_profile(mut profile: TrigramProfile) -> TrigramProfile {
    let norm = profile.values().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in profile.values_mut() {
            *v /= norm;
        }
    }
    profile
}

/// Dot product of two profiles. This is the cosine similarity only when both
/// sides are already unit-normalized.
///
/// Always walks `a` and looks its keys up in `b`, so scoring one text profile
/// against several references sums in the same key order every time and equal
/// references get bit-identical scores.
pub fn get_cosine_similarity(a: &TrigramProfile, b: &TrigramProfile) -> f32 {
    a.iter()
        .filter_map(|(trigram, weight)| b.get(trigram).map(|other| weight * other))
        .sum()
}

fn strip_line(line: &str) -> &str {
    // CRLF files leave a single '\r' behind after line splitting
    line.strip_suffix('\r').unwrap_or(line)
}
