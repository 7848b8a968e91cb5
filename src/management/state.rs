use std::{fmt, io::Error, path::Path};

use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug)]
pub enum StateError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::IoError(e) => write!(f, "state file I/O failed: {e}"),
            StateError::SerdeError(e) => write!(f, "state file is malformed: {e}"),
        }
    }
}

impl std::error::Error for StateError {}

impl From<Error> for StateError {
    fn from(err: Error) -> Self {
        StateError::IoError(err)
    }
}

impl From<serde_json::Error> for StateError {
    fn from(err: serde_json::Error) -> Self {
        StateError::SerdeError(err)
    }
}

/// Reads a whole JSON document, or the default value when the file does not exist.
pub(crate) async fn load_document<T>(path: &Path) -> Result<T, StateError>
where
    T: DeserializeOwned + Default,
{
    if !path.is_file() {
        return Ok(T::default());
    }
    let json = async_fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}

/// Rewrites the whole JSON document at `path`.
pub(crate) async fn persist_document<T: Serialize>(path: &Path, document: &T) -> Result<(), StateError> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(document)?;
    async_fs::write(path, json).await?;
    Ok(())
}
