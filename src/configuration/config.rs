#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::collections::HashMap;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    CredentialFile,
    GatewayTimeout,
    GatewayURL,
    IngestListen,
    MirrorFile,
    PageSize,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let config_dir = dirs::config_dir().unwrap().join("blipdesk");
        let data_dir = dirs::data_dir().unwrap().join("blipdesk");

        let res = match key {
            ConfigKey::ConfigFile => config_dir.join("config.toml").to_string_lossy().to_string(),
            ConfigKey::CredentialFile => config_dir
                .join("credential.toml")
                .to_string_lossy()
                .to_string(),
            ConfigKey::GatewayTimeout => "10000".to_string(),
            ConfigKey::GatewayURL => "https://http.msging.net".to_string(),
            ConfigKey::IngestListen => "127.0.0.1:4615".to_string(),
            ConfigKey::MirrorFile => data_dir.join("mirror.sqlite").to_string_lossy().to_string(),
            ConfigKey::PageSize => "10".to_string(),
        };

        return res;
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let mut staged: HashMap<String, String> = HashMap::new();
        for key in ConfigKey::iter() {
            staged.insert(key.to_string(), Config::default(key));
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Some(arg_config_file) =
                matches.get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        staged.insert(key.to_string(), val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        staged.insert(key.to_string(), val_str.to_string());
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    staged.insert(key.to_string(), val.to_string());
                }
            }
        }

        for key in [ConfigKey::GatewayTimeout, ConfigKey::PageSize] {
            if let Some(val) = staged.get(&key.to_string()) {
                if val.parse::<u64>().is_err() {
                    bail!(format!(
                        "config has an invalid value for key '{key}': {val}. Expected a number."
                    ));
                }
            }
        }

        for (key, val) in staged {
            CONFIG.insert(key, val);
        }

        tracing::debug!(
            gateway_url = Config::get(ConfigKey::GatewayURL),
            gateway_timeout = Config::get(ConfigKey::GatewayTimeout),
            page_size = Config::get(ConfigKey::PageSize),
            ingest_listen = Config::get(ConfigKey::IngestListen),
            mirror_file = Config::get(ConfigKey::MirrorFile),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                // Path defaults are machine-specific, keep them commented.
                if key == ConfigKey::CredentialFile || key == ConfigKey::MirrorFile {
                    return Some(format!("# {key} = \"\""));
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long().unwrap() == key.to_string())
                    .unwrap();

                let mut description = arg.get_help().unwrap().to_string();
                description = description
                    .split("[default:")
                    .next()
                    .unwrap()
                    .trim()
                    .to_string();

                return Some(format!(
                    "# {description}\n{key} = \"{}\"",
                    Config::default(key)
                ));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return format!("{toml_str}\n");
    }
}
