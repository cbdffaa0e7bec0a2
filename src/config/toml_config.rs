use crate::core::render::OutputFormat;
use crate::utils::error::{DirectoryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional config file; every section and key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub query: QuerySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    pub url: Option<String>,
    pub input_file: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuerySection {
    pub kind: Option<String>,
}

impl TomlConfig {
    /// Loads a config file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DirectoryError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DirectoryError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
url = "https://example.com/bolivia-maes.json"
timeout_seconds = 20

[output]
format = "csv"
path = "./out"

[query]
kind = "Viceministerio"
"#,
        )
        .unwrap();

        assert_eq!(
            config.source.url.as_deref(),
            Some("https://example.com/bolivia-maes.json")
        );
        assert_eq!(config.source.timeout_seconds, Some(20));
        assert_eq!(config.output.format, Some(OutputFormat::Csv));
        assert_eq!(config.output.path.as_deref(), Some("./out"));
        assert_eq!(config.query.kind.as_deref(), Some("Viceministerio"));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.source.url.is_none());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = TomlConfig::from_toml_str("[source]\nretries = 3\n").unwrap_err();
        assert!(matches!(err, DirectoryError::Config { .. }));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("GABINETE_TEST_HOST", "mirror.example.org");
        let config = TomlConfig::from_toml_str(
            "[source]\nurl = \"https://${GABINETE_TEST_HOST}/data.json\"\n",
        )
        .unwrap();
        assert_eq!(
            config.source.url.as_deref(),
            Some("https://mirror.example.org/data.json")
        );

        let config =
            TomlConfig::from_toml_str("[source]\nurl = \"${GABINETE_UNSET_VAR_XYZ}\"\n").unwrap();
        assert_eq!(config.source.url.as_deref(), Some("${GABINETE_UNSET_VAR_XYZ}"));
    }
}
