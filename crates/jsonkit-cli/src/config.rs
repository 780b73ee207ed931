use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};

/// Output defaults, optionally read from a TOML file.
///
/// ```toml
/// format = "json"
/// color = false
/// indent = 4
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub format: OutputFormat,
    pub color: bool,
    /// Spaces per nesting level in JSON output and tree views.
    pub indent: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            indent: 2,
        }
    }
}

impl CliConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// File values (if any), then command-line overrides.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(format) = cli.format {
            config.format = format;
        }
        if cli.no_color {
            config.color = false;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = CliConfig::default();
        assert_eq!(c.format, OutputFormat::Text);
        assert!(c.color);
        assert_eq!(c.indent, 2);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = CliConfig::from_toml("indent = 4").unwrap();
        assert_eq!(c.indent, 4);
        assert_eq!(c.format, OutputFormat::Text);
        assert!(c.color);
    }

    #[test]
    fn full_toml() {
        let c = CliConfig::from_toml("format = \"json\"\ncolor = false\nindent = 0\n").unwrap();
        assert_eq!(
            c,
            CliConfig { format: OutputFormat::Json, color: false, indent: 0 }
        );
    }

    #[test]
    fn bad_format_rejected() {
        assert!(CliConfig::from_toml("format = \"yaml\"").is_err());
    }

    #[test]
    fn load_from_file_then_flags_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"json\"\nindent = 3").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["jsonkit", "--config", path.as_str(), "jwt", "t"]).unwrap();
        let c = CliConfig::resolve(&cli).unwrap();
        assert_eq!(c.format, OutputFormat::Json);
        assert_eq!(c.indent, 3);

        let cli = Cli::try_parse_from([
            "jsonkit", "--config", path.as_str(), "--format", "text", "--no-color", "jwt", "t",
        ])
        .unwrap();
        let c = CliConfig::resolve(&cli).unwrap();
        assert_eq!(c.format, OutputFormat::Text);
        assert!(!c.color);
        assert_eq!(c.indent, 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
