use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub inspect: InspectConfig,
    pub render: RenderConfig,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the Markdown pages are written to
    pub directory: PathBuf,
}

/// Inspection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InspectConfig {
    /// Attach class docstrings to the inspected classes.
    ///
    /// Off by default: classes render the "no documentation" placeholder
    /// even when they carry a docstring.
    pub class_docs: bool,
}

/// Rendering settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit a placeholder for undocumented methods, like functions get
    pub method_placeholder: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("doc"),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file if one was given, otherwise use defaults
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, output: Option<PathBuf>) {
        if let Some(out) = output {
            self.output.directory = out;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.directory.as_os_str().is_empty() {
            return Err(Error::config_validation(
                "output directory must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.directory, PathBuf::from("doc"));
        assert!(!config.inspect.class_docs);
        assert!(!config.render.method_placeholder);
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[output]
directory = "site/api"

[inspect]
class_docs = true

[render]
method_placeholder = true
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("site/api"));
        assert!(config.inspect.class_docs);
        assert!(config.render.method_placeholder);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[inspect]\nclass_docs = true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("doc"));
        assert!(config.inspect.class_docs);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/doc2md.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output\ndirectory = ").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_optional_none() {
        let config = Config::load_optional(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validation_empty_directory() {
        let mut config = Config::default();
        config.output.directory = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_cli_output() {
        let mut config = Config::default();
        config.merge_cli(Some(PathBuf::from("/custom/output")));
        assert_eq!(config.output.directory, PathBuf::from("/custom/output"));
    }

    #[test]
    fn test_merge_cli_keeps_config_value() {
        let mut config = Config::default();
        config.output.directory = PathBuf::from("from-file");
        config.merge_cli(None);
        assert_eq!(config.output.directory, PathBuf::from("from-file"));
    }
}
