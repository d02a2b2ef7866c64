use crate::config::Config;
use crate::identifier::{identify_language, rank_languages};
use crate::profile_loader::ProfileLoader;
use crate::text::{has_less_than_n_chars, read_text};
use crate::trigram::TRIGRAM_LEN;
use anyhow::Context;
use log::{info, warn};
use std::io::Write;

/// Printed when no language scores above zero.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Logger for the binary. `RUST_LOG` (or whatever `env` reads) sets the
/// filter, defaulting to info; an explicit `log_level` wins over both.
pub fn logger_builder(log_level: Option<&str>, env: env_logger::Env) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env.default_filter_or("info"));
    if let Some(level) = log_level {
        builder.parse_filters(level);
    }
    builder.format_timestamp_millis();
    builder
}

/// Load profiles, read the input and write the result to `out`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    let (languages, report) = ProfileLoader::new()
        .load_directory(&config.profiles_dir)
        .context("Failed to load language profiles")?;
    if !report.errors.is_empty() {
        info!("{} profile problems were skipped", report.errors.len());
    }

    let text = read_text(config.input.as_deref()).context("Failed to read input text")?;
    if has_less_than_n_chars(&text, TRIGRAM_LEN) {
        warn!("Input is too short to identify");
        return Ok(());
    }

    if config.scores {
        let ranking = rank_languages(&text, &languages);
        let limit = config.top.unwrap_or(ranking.len());
        for score in ranking.iter().take(limit) {
            writeln!(out, "{}\t{:.6}", score.language_code, score.score)?;
        }
    } else {
        let language = identify_language(&text, &languages);
        if language.is_empty() {
            writeln!(out, "{}", UNKNOWN_LANGUAGE)?;
        } else {
            writeln!(out, "{}", language)?;
        }
    }

    Ok(())
}
