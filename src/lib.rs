pub mod app;
pub mod config;
pub mod error;
pub mod identifier;
pub mod profile_loader;
pub mod text;
pub mod trigram;

pub use error::{LequelError, Result};
pub use identifier::{
    identify_language, rank_languages, LanguageProfile, LanguageProfiles, LanguageScore,
};
pub use profile_loader::{LoadReport, ProfileLoader};
pub use text::{has_less_than_n_chars, read_text, Text};
pub use trigram::{
    build_trigram_profile, get_cosine_similarity, normalize_trigram_profile, TrigramProfile,
};
