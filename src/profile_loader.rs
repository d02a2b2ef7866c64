use crate::error::{LequelError, Result};
use crate::identifier::{LanguageProfile, LanguageProfiles};
use crate::trigram::{normalize_trigram_profile, TrigramProfile};
use csv::{Position, ReaderBuilder};
use log::{info, warn};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const PROFILE_EXTENSION: &str = "csv";

#[derive(Debug, Deserialize)]
struct TrigramRecord {
    trigram: String,
    frequency: f32,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped_files: usize,
    pub skipped_records: usize,
    pub errors: Vec<String>,
}

pub struct ProfileLoader;

impl ProfileLoader {
    pub fn new() -> Self {
        ProfileLoader
    }

    /// Load one `<code>.csv` file of `trigram,frequency` records into a
    /// normalized language profile.
    ///
    /// Bad records are skipped and described in the returned error list; only
    /// failures to open or read the file abort the load.
    pub fn load_file(&self, path: &Path) -> Result<(LanguageProfile, Vec<String>)> {
        let language_code = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let bytes = fs::read(path).map_err(|source| LequelError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut profile = TrigramProfile::new();
        let mut errors = Vec::new();

        let mut record = csv::StringRecord::new();

        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {
                    let line = record_line(&bytes, record.position());
                    match record.deserialize::<TrigramRecord>(None) {
                        Ok(parsed) if parsed.trigram.is_empty() => {
                            errors.push(format!("{} line {}: empty trigram", path.display(), line));
                        }
                        Ok(parsed) if !parsed.frequency.is_finite() || parsed.frequency < 0.0 => {
                            errors.push(format!(
                                "{} line {}: invalid frequency {}",
                                path.display(),
                                line,
                                parsed.frequency
                            ));
                        }
                        Ok(parsed) => {
                            *profile.entry(parsed.trigram).or_insert(0.0) += parsed.frequency;
                        }
                        Err(e) => {
                            errors.push(format!("{} line {}: {}", path.display(), line, e));
                        }
                    }
                }
                Ok(false) => break,
                Err(e) => {
                    let line = record_line(&bytes, e.position());
                    errors.push(format!("{} line {}: {}", path.display(), line, e));
                }
            }
        }

        for error in &errors {
            warn!("Skipped profile record: {}", error);
        }

        Ok((
            LanguageProfile::new(language_code, normalize_trigram_profile(profile)),
            errors,
        ))
    }

    /// Load every `.csv` profile directly inside `dir_path`, sorted by
    /// language code.
    pub fn load_directory(&self, dir_path: &Path) -> Result<(LanguageProfiles, LoadReport)> {
        if !dir_path.is_dir() {
            return Err(LequelError::MissingProfileDir(
                dir_path.display().to_string(),
            ));
        }

        let paths = Self::profile_paths(dir_path);
        info!(
            "Loading {} language profiles from {}",
            paths.len(),
            dir_path.display()
        );

        let results: Vec<(PathBuf, Result<(LanguageProfile, Vec<String>)>)> = paths
            .into_par_iter()
            .map(|path| {
                let result = self.load_file(&path);
                (path, result)
            })
            .collect();

        let mut report = LoadReport::default();
        let mut languages = LanguageProfiles::new();

        for (path, result) in results {
            match result {
                Ok((language, errors)) if language.trigram_profile.is_empty() => {
                    warn!("Profile {} has no usable trigrams", path.display());
                    report.skipped_files += 1;
                    report.skipped_records += errors.len();
                    report.errors.extend(errors);
                    report
                        .errors
                        .push(format!("{}: no usable trigrams", path.display()));
                }
                Ok((language, errors)) => {
                    report.loaded += 1;
                    report.skipped_records += errors.len();
                    report.errors.extend(errors);
                    languages.push(language);
                }
                Err(e) => {
                    warn!("{}", e);
                    report.skipped_files += 1;
                    report.errors.push(e.to_string());
                }
            }
        }

        if languages.is_empty() {
            return Err(LequelError::NoProfiles(dir_path.display().to_string()));
        }

        languages.sort_by(|a, b| a.language_code.cmp(&b.language_code));

        info!(
            "Loaded {} language profiles ({} files skipped, {} records skipped)",
            report.loaded, report.skipped_files, report.skipped_records
        );

        Ok((languages, report))
    }

    fn profile_paths(dir_path: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir_path)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!("WalkDir error while reading {}: {}", dir_path.display(), err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(PROFILE_EXTENSION))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Line of the first byte of a record. csv positions a record where the
/// previous one ended, before any blank lines it skipped.
fn record_line(bytes: &[u8], position: Option<&Position>) -> u64 {
    let Some(position) = position else {
        return 0;
    };
    let start = (position.byte() as usize).min(bytes.len());
    let skipped = bytes[start..]
        .iter()
        .take_while(|b| **b == b'\n' || **b == b'\r')
        .filter(|b| **b == b'\n')
        .count();
    position.line() + skipped as u64
}

impl Default for ProfileLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("trigrams")
    }

    fn norm(profile: &TrigramProfile) -> f32 {
        profile.values().map(|v| v * v).sum::<f32>().sqrt()
    }

    #[test]
    fn loads_fixture_profiles_in_code_order() {
        let loader = ProfileLoader::new();
        let (languages, report) = loader
            .load_directory(&fixture_dir())
            .expect("fixture profiles should load");

        let codes: Vec<&str> = languages.iter().map(|l| l.language_code.as_str()).collect();
        assert_eq!(codes, vec!["de", "en", "es", "fr"]);
        assert_eq!(report.loaded, 4);
        assert_eq!(report.skipped_files, 0);
        for language in &languages {
            assert!((norm(&language.trigram_profile) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn fixture_profiles_identify_sample_sentences() {
        let (languages, _) = ProfileLoader::new()
            .load_directory(&fixture_dir())
            .expect("fixture profiles should load");

        assert_eq!(
            crate::identify_language(&["the weather is nice and the sun is out"], &languages),
            "en"
        );
        assert_eq!(
            crate::identify_language(&["el perro come en la casa de los abuelos"], &languages),
            "es"
        );
    }

    #[test]
    fn bundled_profiles_identify_each_language() {
        let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("resources")
            .join("trigrams");
        let (languages, report) = ProfileLoader::new()
            .load_directory(&bundled)
            .expect("bundled profiles should load");

        assert_eq!(report.loaded, 6);
        assert!(report.errors.is_empty(), "{:?}", report.errors);

        let samples = [
            ("de", "ich habe heute keine zeit für einen spaziergang"),
            ("en", "the dog is sleeping in the sun near the house"),
            ("es", "el niño quiere comer una manzana en la cocina"),
            ("fr", "nous allons au marché avec les enfants ce matin"),
            ("it", "oggi andiamo al ristorante con gli amici di mia madre"),
            ("pt", "hoje vamos ao restaurante com os amigos da minha mãe"),
        ];
        for (code, sentence) in samples {
            assert_eq!(crate::identify_language(&[sentence], &languages), code);
        }
    }

    #[test]
    fn keeps_trigram_whitespace_and_accumulates_duplicates() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("xx.csv");
        fs::write(&path, "the,3\n he,4\nthe,1\n").expect("write profile");

        let (language, errors) = ProfileLoader::new().load_file(&path).expect("load");
        assert!(errors.is_empty());
        assert_eq!(language.language_code, "xx");
        assert_eq!(language.trigram_profile.len(), 2);
        let the = language.trigram_profile["the"];
        let he = language.trigram_profile[" he"];
        assert!((the - he).abs() < 1e-6);
        assert!((the - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
    }

    #[test]
    fn bad_records_are_skipped_and_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(
            dir.path().join("xx.csv"),
            "abc,2\nbcd,lots\n,5\ncde,-1\ndef\nefg,2\n",
        )
        .expect("write profile");
        fs::write(dir.path().join("notes.txt"), "not a profile").expect("write notes");

        let (languages, report) = ProfileLoader::new()
            .load_directory(dir.path())
            .expect("load directory");

        assert_eq!(languages.len(), 1);
        assert_eq!(languages[0].trigram_profile.len(), 2);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped_records, 4);
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn record_errors_name_the_file_line() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("xx.csv");
        fs::write(&path, "abc,1\n\n\nbcd,many\ncde,2\n\n,3\n").expect("write profile");

        let (language, errors) = ProfileLoader::new().load_file(&path).expect("load");
        assert_eq!(language.trigram_profile.len(), 2);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("line 4:"), "{}", errors[0]);
        assert!(errors[1].contains("line 7:"), "{}", errors[1]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = ProfileLoader::new().load_directory(Path::new("/nonexistent/trigrams"));
        assert!(matches!(result, Err(LequelError::MissingProfileDir(_))));
    }

    #[test]
    fn directory_without_usable_profiles_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("xx.csv"), "").expect("write profile");

        let result = ProfileLoader::new().load_directory(dir.path());
        assert!(matches!(result, Err(LequelError::NoProfiles(_))));
    }
}
