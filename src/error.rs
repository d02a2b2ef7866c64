use thiserror::Error;

#[derive(Error, Debug)]
pub enum LequelError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile directory does not exist: {0}")]
    MissingProfileDir(String),

    #[error("No usable language profiles found in {0}")]
    NoProfiles(String),
}

pub type Result<T> = std::result::Result<T, LequelError>;
