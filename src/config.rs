use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AnalyzerError, AnalyzerResult};

pub const DEFAULT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub output: OutputConfig,
    pub classifier: ClassifierConfig,
}

impl AnalyzerConfig {
    pub fn load(path: Option<&Path>) -> AnalyzerResult<Self> {
        let config = if let Some(path) = path {
            let data = std::fs::read_to_string(path).map_err(|e| {
                AnalyzerError::Config(format!("failed to read config {}: {e}", path.display()))
            })?;
            toml::from_str::<AnalyzerConfig>(&data).map_err(|e| {
                AnalyzerError::Config(format!("failed to parse config {}: {e}", path.display()))
            })?
        } else {
            AnalyzerConfig::default()
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AnalyzerResult<()> {
        if self.output.preview_chars == 0 {
            return Err(AnalyzerError::Config(
                "output.preview_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub preview_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Settings for the bundled classifiers. Without a lexicon path the built-in
/// word lists are used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub lexicon_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let config = AnalyzerConfig::load(None).unwrap();
        assert_eq!(config.output.preview_chars, 200);
        assert!(config.classifier.lexicon_path.is_none());
    }

    #[test]
    fn reads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\npreview_chars = 80").unwrap();

        let config = AnalyzerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.output.preview_chars, 80);
        assert!(config.classifier.lexicon_path.is_none());
    }

    #[test]
    fn rejects_zero_preview() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\npreview_chars = 0").unwrap();

        let err = AnalyzerConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, AnalyzerError::Config(_)));
    }

    #[test]
    fn unreadable_config_is_a_config_error() {
        let err = AnalyzerConfig::load(Some(Path::new("/nonexistent/analyzer.toml"))).unwrap_err();
        assert!(matches!(err, AnalyzerError::Config(_)));
    }
}
