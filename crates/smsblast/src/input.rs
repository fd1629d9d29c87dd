//! Flat-file inputs: recipient numbers and the message body.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use phonenumber::Mode;
use thiserror::Error;
use tracing::debug;

/// What went wrong loading an input file. The CLI maps these onto its
/// documented exit codes.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("input file not found: {path}")]
    NotFound { path: String },

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no valid phone numbers in {path}")]
    NoValidNumbers { path: String },

    #[error("message content in {path} is empty")]
    EmptyMessage { path: String },
}

/// Load, normalize, deduplicate and sort recipient numbers.
///
/// Each non-blank line is run through the full phone-number grammar with no
/// default region, so numbers must carry their country code. Whatever
/// formatting the file uses, the output is E.164. Unparseable lines are
/// dropped, not fatal; a file that yields nothing at all is.
///
/// The result is sorted ascending, so a given input file always produces the
/// same send order.
pub fn load_recipients(path: &Path) -> Result<Vec<String>, InputError> {
    let raw = read(path)?;
    let mut numbers = BTreeSet::new();
    for line in raw.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        match phonenumber::parse(None, line) {
            Ok(number) => {
                numbers.insert(number.format().mode(Mode::E164).to_string());
            }
            Err(err) => {
                debug!(line, error = %err, "dropping unparseable number");
            }
        }
    }
    if numbers.is_empty() {
        return Err(InputError::NoValidNumbers {
            path: display(path),
        });
    }
    Ok(numbers.into_iter().collect())
}

/// The message body: the first line of the file, stripped of surrounding
/// whitespace. Everything after the first line is ignored, which keeps the
/// payload inside what `input text` can inject in one call.
pub fn load_message_body(path: &Path) -> Result<String, InputError> {
    let raw = read(path)?;
    let body = raw.lines().next().unwrap_or("").trim();
    if body.is_empty() {
        return Err(InputError::EmptyMessage {
            path: display(path),
        });
    }
    Ok(body.to_string())
}

fn read(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            InputError::NotFound {
                path: display(path),
            }
        } else {
            InputError::Io {
                path: display(path),
                source: err,
            }
        }
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
