use crate::trigram::{
    build_trigram_profile, get_cosine_similarity, normalize_trigram_profile, TrigramProfile,
};
use log::debug;

/// Reference profile for one language. The profile is expected to be
/// unit-normalized already; [`crate::profile_loader`] guarantees that.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub language_code: String,
    pub trigram_profile: TrigramProfile,
}

pub type LanguageProfiles = Vec<LanguageProfile>;

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageScore {
    pub language_code: String,
    pub score: f32,
}

impl LanguageProfile {
    pub fn new(language_code: impl Into<String>, trigram_profile: TrigramProfile) -> Self {
        LanguageProfile {
            language_code: language_code.into(),
            trigram_profile,
        }
    }
}

/// Returns the code of the most similar language, or an empty string when
/// no language scores above zero.
///
/// Ties keep the language that comes first in `languages`.
pub fn identify_language<S: AsRef<str>>(text: &[S], languages: &[LanguageProfile]) -> String {
    let Some(profile) = prepare_text_profile(text, languages) else {
        return String::new();
    };

    let mut best_score = 0.0f32;
    let mut best_language = String::new();

    for (language, score) in score_languages(&profile, languages) {
        if score > best_score {
            best_score = score;
            best_language = language.language_code.clone();
        }
    }

    if !best_language.is_empty() {
        debug!("Identified '{}' with score {:.4}", best_language, best_score);
    }

    best_language
}

/// Scores every usable language and returns them best first.
pub fn rank_languages<S: AsRef<str>>(
    text: &[S],
    languages: &[LanguageProfile],
) -> Vec<LanguageScore> {
    let Some(profile) = prepare_text_profile(text, languages) else {
        return Vec::new();
    };

    let mut results: Vec<LanguageScore> = score_languages(&profile, languages)
        .map(|(language, score)| LanguageScore {
            language_code: language.language_code.clone(),
            score,
        })
        .collect();

    // stable: equal scores keep loader order
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    results
}

fn prepare_text_profile<S: AsRef<str>>(
    text: &[S],
    languages: &[LanguageProfile],
) -> Option<TrigramProfile> {
    let profile = build_trigram_profile(text);
    if profile.is_empty() || languages.is_empty() {
        debug!(
            "Skipping identification: {} trigrams, {} languages",
            profile.len(),
            languages.len()
        );
        return None;
    }
    Some(normalize_trigram_profile(profile))
}

fn score_languages<'a>(
    profile: &'a TrigramProfile,
    languages: &'a [LanguageProfile],
) -> impl Iterator<Item = (&'a LanguageProfile, f32)> + 'a {
    languages
        .iter()
        .filter(|language| !language.trigram_profile.is_empty())
        .map(move |language| {
            let score = get_cosine_similarity(profile, &language.trigram_profile);
            debug!("Score for '{}': {:.4}", language.language_code, score);
            (language, score)
        })
}
