use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{LingoError, Result};

/// Target languages used when none are given on the command line.
pub const DEFAULT_LANGUAGES: [&str; 3] = ["ar", "fr", "es"];

const BUILTIN_NAMES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("ga", "Irish"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kk", "Kazakh"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("mt", "Maltese"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("ps", "Pashto"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("so", "Somali"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

/// ISO code to language name lookup used in engine prompts.
#[derive(Debug, Clone)]
pub struct LanguageNames {
    names: BTreeMap<String, String>,
}

impl Default for LanguageNames {
    fn default() -> Self {
        Self {
            names: BUILTIN_NAMES
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl LanguageNames {
    /// Built-in table, with entries from an optional JSON object file layered on top.
    pub fn load(override_file: Option<&Path>) -> Result<Self> {
        let mut names = Self::default();
        if let Some(path) = override_file {
            let content = std::fs::read_to_string(path)
                .map_err(|e| LingoError::Language(format!("Failed to read {}: {}", path.display(), e)))?;
            let extra: BTreeMap<String, String> = serde_json::from_str(&content)?;
            names.names.extend(extra);
        }
        Ok(names)
    }

    /// Language name for `code`, or the code itself when unknown.
    pub fn name<'a>(&'a self, code: &'a str) -> &'a str {
        self.names
            .get(&code.to_lowercase())
            .map(String::as_str)
            .unwrap_or(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(&code.to_lowercase())
    }

    /// Known `(code, name)` pairs sorted by code
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(code, name)| (code.as_str(), name.as_str()))
    }
}

/// User-selected target languages persisted as a JSON array.
pub struct LanguageManager {
    path: PathBuf,
    names: LanguageNames,
}

impl LanguageManager {
    pub fn new<P: AsRef<Path>>(path: P, names: LanguageNames) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            names,
        }
    }

    pub fn names(&self) -> &LanguageNames {
        &self.names
    }

    /// Selected languages; defaults when the file is missing or unreadable.
    pub fn languages(&self) -> Vec<String> {
        let defaults = || DEFAULT_LANGUAGES.iter().map(|c| c.to_string()).collect();
        if !self.path.exists() {
            return defaults();
        }
        match std::fs::read_to_string(&self.path)
            .map_err(LingoError::from)
            .and_then(|content| serde_json::from_str::<Vec<String>>(&content).map_err(LingoError::from))
        {
            Ok(languages) => languages,
            Err(e) => {
                warn!("Failed to read {}, using defaults: {}", self.path.display(), e);
                defaults()
            }
        }
    }

    pub fn add(&self, code: &str) -> Result<Vec<String>> {
        let code = code.trim().to_lowercase();
        if code.is_empty() {
            return Err(LingoError::Language("Language code cannot be empty".to_string()));
        }
        if !self.names.contains(&code) {
            return Err(LingoError::Language(format!("{} not found in language map", code)));
        }

        let mut languages = self.languages();
        if languages.contains(&code) {
            return Err(LingoError::Language(format!("{} already in the list", code)));
        }
        languages.push(code.clone());
        self.save(&languages)?;
        info!("Added language {} ({})", code, self.names.name(&code));
        Ok(languages)
    }

    pub fn remove(&self, code: &str) -> Result<Vec<String>> {
        let code = code.trim().to_lowercase();
        let mut languages = self.languages();
        let before = languages.len();
        languages.retain(|c| c != &code);
        if languages.len() == before {
            return Err(LingoError::Language(format!("{} is not in the list", code)));
        }
        self.save(&languages)?;
        info!("Removed language {}", code);
        Ok(languages)
    }

    fn save(&self, languages: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(languages)?)?;
        Ok(())
    }
}
