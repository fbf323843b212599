use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub properties: Option<String>,
    #[serde(alias = "agents_data")]
    pub agents: Option<String>,
    pub timeout: Option<u64>,
    pub output: Option<String>,
    #[serde(alias = "output_format")]
    pub format: Option<String>,
    pub fallback: Option<String>,
    pub sort: Option<String>,
    pub recent_cap: Option<usize>,
    pub storage_path: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

fn app_dir() -> Option<PathBuf> {
    Some(home_dir()?.join(".homescout"))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(app_dir()?.join("config.yml"))
}

/// Stand-in for the browser's local storage.
pub fn default_storage_path() -> Option<PathBuf> {
    Some(app_dir()?.join("storage.json"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Homescout config
#
# Location (default):
#   ~/.homescout/config.yml

# Data sources (file path or http(s) URL)
properties: ./fixtures/properties.json
agents: ./fixtures/agents.json
timeout: 10

# Output (optional)
# output: ./page.html
# format: html

# Detail pages opened without an identifier: first-record or not-found
fallback: first-record

# Listing page default sort: newest, price_asc, price_desc, featured
sort: newest

# Recent searches
recent_cap: 5
# storage_path: ~/.homescout/storage.json

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses_with_every_field_set() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.properties.as_deref(), Some("./fixtures/properties.json"));
        assert_eq!(cfg.fallback.as_deref(), Some("first-record"));
        assert_eq!(cfg.recent_cap, Some(5));
        assert_eq!(cfg.output, None);
    }

    #[test]
    fn missing_config_is_allowed_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).is_err());

        ensure_default_config_file(&path).unwrap();
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.sort.as_deref(), Some("newest"));
    }

    #[test]
    fn agents_data_alias_is_accepted() {
        let cfg: ConfigFile = serde_yaml::from_str("agents_data: https://example.com/a.json\n").unwrap();
        assert_eq!(cfg.agents.as_deref(), Some("https://example.com/a.json"));
    }
}
