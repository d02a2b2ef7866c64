use clap::Parser;
use std::path::PathBuf;

/// Lequel - identify the language of a text from its character trigrams
#[derive(Parser, Debug)]
#[command(name = "lequel", version)]
pub struct Config {
    /// Text file to identify (reads stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Directory holding one `<language_code>.csv` trigram profile per language
    #[arg(long = "profiles", env = "LEQUEL_PROFILES", default_value = "resources/trigrams")]
    pub profiles_dir: PathBuf,

    /// Print every language with its similarity score instead of only the best one
    #[arg(long)]
    pub scores: bool,

    /// Limit the number of scored languages printed with --scores
    #[arg(long, requires = "scores")]
    pub top: Option<usize>,

    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG when given
    #[arg(long, env = "LEQUEL_LOG", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: Option<String>,
}
