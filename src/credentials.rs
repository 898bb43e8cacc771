use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Where to look for an API key, in order of precedence.
#[derive(Debug, Clone)]
pub struct KeySources {
    pub env_var: String,
    /// A `KEY=value` file; the entry named like `env_var` is used.
    pub dotenv_file: PathBuf,
    /// Files that contain nothing but the key.
    pub key_files: Vec<PathBuf>,
}

fn non_empty(value: impl AsRef<str>) -> Option<String> {
    let value = value.as_ref().trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl KeySources {
    /// Returns the first non-empty key, starting with `explicit`.
    pub fn resolve(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .and_then(non_empty)
            .or_else(|| env::var(&self.env_var).ok().and_then(non_empty))
            .or_else(|| key_from_dotenv_file(&self.dotenv_file, &self.env_var))
            .or_else(|| self.key_files.iter().find_map(|f| key_from_file(f)))
    }
}

fn key_from_dotenv_file(path: &Path, key_name: &str) -> Option<String> {
    let entries = dotenvy::from_path_iter(path).ok()?;
    let value = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skip malformed line in {}: {err}", path.display());
                None
            }
        })
        .find(|(k, _)| k == key_name)
        .map(|(_, v)| v)?;
    log::debug!("Found {key_name} in {}", path.display());
    non_empty(value)
}

fn key_from_file(path: &Path) -> Option<String> {
    let value = fs::read_to_string(path).ok()?;
    log::debug!("Read API key from {}", path.display());
    non_empty(value)
}
