use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LingoError, Result};

/// Secret bundle for one engine, stored as a flat string map.
pub type CredentialBundle = BTreeMap<String, String>;

pub const OPENAI_KEY: &str = "openai_key";
pub const AWS_ACCESS_KEY: &str = "aws_access_key";
pub const AWS_SECRET_KEY: &str = "aws_secret_key";

/// Engine-keyed credentials persisted as a JSON side-file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialStore {
    #[serde(flatten)]
    engines: BTreeMap<String, CredentialBundle>,
    #[serde(skip)]
    path: PathBuf,
}

impl CredentialStore {
    /// Load the store; a missing file yields an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut store = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<CredentialStore>(&content).map_err(|e| {
                LingoError::Credentials(format!("Could not read saved credentials: {}", e))
            })?
        } else {
            CredentialStore::default()
        };
        store.path = path.to_path_buf();
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn engines(&self) -> impl Iterator<Item = (&String, &CredentialBundle)> {
        self.engines.iter()
    }

    /// Replace the bundle for `engine` and write the whole store back.
    pub fn save(&mut self, engine: &str, bundle: CredentialBundle) -> Result<()> {
        self.engines.insert(engine.to_string(), bundle);
        self.persist()?;
        info!("Credentials for {} saved in {}", engine, self.path.display());
        Ok(())
    }

    /// Remove one engine's bundle, or the whole file when `engine` is `None`.
    pub fn clear(&mut self, engine: Option<&str>) -> Result<()> {
        match engine {
            Some(engine) => {
                if self.engines.remove(engine).is_some() {
                    self.persist()?;
                }
            }
            None => {
                self.engines.clear();
                if self.path.exists() {
                    std::fs::remove_file(&self.path)?;
                }
            }
        }
        info!("Credentials cleared from {}", self.path.display());
        Ok(())
    }

    /// Look up a secret, falling back to an environment variable.
    pub fn get(&self, engine: &str, key: &str, env_var: &str) -> Option<String> {
        self.engines
            .get(engine)
            .and_then(|bundle| bundle.get(key))
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .or_else(|| std::env::var(env_var).ok().filter(|v| !v.trim().is_empty()))
    }

    /// Like [`get`](Self::get), but missing secrets are an error.
    pub fn require(&self, engine: &str, key: &str, env_var: &str) -> Result<String> {
        self.get(engine, key, env_var).ok_or_else(|| {
            LingoError::Credentials(format!(
                "No '{}' stored for {} and {} is not set",
                key, engine, env_var
            ))
        })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.engines)?;
        if let Err(e) = std::fs::write(&self.path, content) {
            warn!("Could not save credentials: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Show only the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
