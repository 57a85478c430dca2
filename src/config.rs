use crate::constants::{
    CONFIG_FILE, DEFAULT_LOOKUP_LIMIT, ENV_OUTPUT, ENV_URL, OUTPUT_PATH, SOURCE_URL, USER_AGENT,
};
use crate::error::{ChemtabError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub user_agent: String,
    /// No timeout when unset.
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: SOURCE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Single ASCII character.
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(OUTPUT_PATH),
            delimiter: ',',
        }
    }
}

impl OutputConfig {
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ChemtabError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )))
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for daily-rolling log files; console only when unset.
    pub dir: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub limit: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LOOKUP_LIMIT,
        }
    }
}

impl Config {
    /// Defaults, overlaid by `path` (or `chemtab.toml` in the working
    /// directory when present), overlaid by environment variables.
    ///
    /// Not validated: command-line overrides still follow, so call
    /// [`Config::validate`] once they are applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with environment variables read through `var`.
    pub fn load_with<F>(path: Option<&Path>, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(CONFIG_FILE).is_file() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env(var);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ChemtabError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `CHEMTAB_URL` and `CHEMTAB_OUTPUT` as returned by `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(ENV_URL).filter(|v| !v.trim().is_empty()) {
            self.source.url = url;
        }
        if let Some(path) = var(ENV_OUTPUT).filter(|v| !v.trim().is_empty()) {
            self.output.path = PathBuf::from(path);
        }
    }

    /// Command-line values, the last layer.
    pub fn apply_overrides(&mut self, url: Option<String>, output: Option<PathBuf>) {
        if let Some(url) = url {
            self.source.url = url;
        }
        if let Some(path) = output {
            self.output.path = path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(ChemtabError::Config("source.url must not be empty".into()));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(ChemtabError::Config("output.path must not be empty".into()));
        }
        if self.lookup.limit == 0 {
            return Err(ChemtabError::Config("lookup.limit must be at least 1".into()));
        }
        self.output.delimiter_byte()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source.url, SOURCE_URL);
        assert_eq!(config.output.path, PathBuf::from("data.csv"));
        assert_eq!(config.output.delimiter_byte().unwrap(), b',');
        assert_eq!(config.source.timeout_seconds, None);
        assert_eq!(config.lookup.limit, 5);
        assert!(config.logging.dir.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [output]
            path = "out/formulae.tsv"
            delimiter = "\t"

            [source]
            timeout_seconds = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.output.path, PathBuf::from("out/formulae.tsv"));
        assert_eq!(config.output.delimiter_byte().unwrap(), b'\t');
        assert_eq!(config.source.timeout_seconds, Some(30));
        assert_eq!(config.source.url, SOURCE_URL);
        assert_eq!(config.source.user_agent, USER_AGENT);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let err = Config::from_toml("[output]\npath = 3").unwrap_err();
        assert!(matches!(err, ChemtabError::Toml(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_URL, "https://example.org/tables"),
            (ENV_OUTPUT, ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.source.url, "https://example.org/tables");
        // blank values are ignored
        assert_eq!(config.output.path, PathBuf::from(OUTPUT_PATH));
    }

    #[test]
    fn test_validate_rejects_non_ascii_delimiter() {
        let mut config = Config::default();
        config.output.delimiter = '→';
        assert!(matches!(config.validate(), Err(ChemtabError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = Config::from_file(Path::new("/nonexistent/chemtab.toml")).unwrap_err();
        assert!(matches!(err, ChemtabError::Config(_)));
    }

    #[test]
    fn test_layers_apply_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chemtab.toml");
        fs::write(
            &path,
            "[source]\nurl = \"https://file.example/page\"\n\n[output]\npath = \"from-file.csv\"\ndelimiter = \";\"\n",
        )
        .unwrap();
        let vars: HashMap<&str, &str> = [
            (ENV_URL, "https://env.example/page"),
            (ENV_OUTPUT, "from-env.csv"),
        ]
        .into_iter()
        .collect();

        let mut config =
            Config::load_with(Some(&path), |k| vars.get(k).map(|v| v.to_string())).unwrap();
        // file beats defaults, env beats file
        assert_eq!(config.output.delimiter, ';');
        assert_eq!(config.source.url, "https://env.example/page");
        assert_eq!(config.output.path, PathBuf::from("from-env.csv"));

        config.apply_overrides(None, Some(PathBuf::from("from-cli.csv")));
        assert_eq!(config.source.url, "https://env.example/page");
        assert_eq!(config.output.path, PathBuf::from("from-cli.csv"));
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_file_url_is_fixed_by_command_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chemtab.toml");
        fs::write(&path, "[source]\nurl = \"\"\n").unwrap();

        let mut config = Config::load_with(Some(&path), |_| None).unwrap();
        assert!(matches!(config.validate(), Err(ChemtabError::Config(_))));

        config.apply_overrides(Some("https://cli.example/page".into()), None);
        config.validate().unwrap();
        assert_eq!(config.source.url, "https://cli.example/page");
        assert_eq!(config.output.path, PathBuf::from(OUTPUT_PATH));
    }
}
