//! Language identifier definitions and file classification

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Language identifier constants
pub const JAVA: &str = "java";
pub const JAVASCRIPT: &str = "javascript";
pub const PYTHON: &str = "python";

/// Languages with a normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Java,
    JavaScript,
    Python,
}

/// Language information structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub language: Language,
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

/// All supported languages
pub const SUPPORTED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        language: Language::Java,
        name: JAVA,
        extensions: &["java"],
    },
    LanguageInfo {
        language: Language::JavaScript,
        name: JAVASCRIPT,
        extensions: &["js", "mjs", "cjs", "jsx"],
    },
    LanguageInfo {
        language: Language::Python,
        name: PYTHON,
        extensions: &["py", "pyi"],
    },
];

impl Language {
    pub fn info(self) -> &'static LanguageInfo {
        SUPPORTED_LANGUAGES
            .iter()
            .find(|info| info.language == self)
            .unwrap_or(&SUPPORTED_LANGUAGES[0])
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn extensions(self) -> &'static [&'static str] {
        self.info().extensions
    }

    /// Classify a file by its extension.
    pub fn from_path(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?;
        SUPPORTED_LANGUAGES
            .iter()
            .find(|info| info.extensions.contains(&ext))
            .map(|info| info.language)
    }
}

/// Pick the normalizer for a file name.
pub fn lang_of_filename(path: &Path) -> Option<Language> {
    Language::from_path(path)
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        SUPPORTED_LANGUAGES
            .iter()
            .find(|info| info.name == lowered || info.extensions.contains(&lowered.as_str()))
            .map(|info| info.language)
            .ok_or(crate::error::Error::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classifies_by_extension() {
        assert_eq!(
            lang_of_filename(&PathBuf::from("src/Main.java")),
            Some(Language::Java)
        );
        assert_eq!(
            lang_of_filename(&PathBuf::from("app/index.mjs")),
            Some(Language::JavaScript)
        );
        assert_eq!(
            lang_of_filename(&PathBuf::from("tool.py")),
            Some(Language::Python)
        );
        assert_eq!(lang_of_filename(&PathBuf::from("README")), None);
        assert_eq!(lang_of_filename(&PathBuf::from("lib.rs")), None);
    }

    #[test]
    fn parses_names_and_extensions() {
        assert_eq!("java".parse::<Language>().unwrap(), Language::Java);
        assert_eq!("JS".parse::<Language>().unwrap(), Language::JavaScript);
        assert_eq!("py".parse::<Language>().unwrap(), Language::Python);
        assert!("cobol".parse::<Language>().is_err());
    }
}
