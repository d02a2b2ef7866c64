use crate::error::{LequelError, Result};
use crate::trigram::TRIGRAM_LEN;
use log::{info, warn};
use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Lines of input text, in their original order.
pub type Text = Vec<String>;

/// Reads a text from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_text(path: Option<&Path>) -> Result<Text> {
    match path {
        Some(path) if path != Path::new("-") => {
            let bytes = fs::read(path).map_err(|source| LequelError::Io {
                path: path.display().to_string(),
                source,
            })?;
            info!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(text_from_bytes(&bytes))
        }
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .map_err(|source| LequelError::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(text_from_bytes(&bytes))
        }
    }
}

/// Splits raw bytes into lines. Malformed UTF-8 is replaced with U+FFFD
/// rather than rejected; trailing '\r' is left for the profile builder.
pub fn text_from_bytes(bytes: &[u8]) -> Text {
    let mut invalid_lines = 0usize;

    let text: Text = bytes
        .split(|b| *b == b'\n')
        .map(|line| {
            let decoded = String::from_utf8_lossy(line);
            if let Cow::Owned(_) = decoded {
                invalid_lines += 1;
            }
            decoded.into_owned()
        })
        .collect();

    if invalid_lines > 0 {
        warn!(
            "Replaced malformed UTF-8 in {} line(s) with U+FFFD",
            invalid_lines
        );
    }

    text
}

/// Coarse pre-filter: true while the combined byte length of all lines stays
/// below the trigram width.
///
/// `_n` is accepted for call-site compatibility but the threshold is fixed at
/// [`TRIGRAM_LEN`].
pub fn has_less_than_n_chars<S: AsRef<str>>(text: &[S], _n: usize) -> bool {
    let mut total = 0usize;
    for line in text {
        total += line.as_ref().len();
        if total >= TRIGRAM_LEN {
            return false;
        }
    }
    true
}
