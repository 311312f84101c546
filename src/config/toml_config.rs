use crate::config::run_config::{
    parse_chest_defs, CareToggles, KeyBinding, Reporter, RunConfiguration,
};
use crate::domain::model::Coord;
use crate::utils::error::{Result, SitterError};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings as written by the player. Every field has a default so a partial file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitterConfig {
    pub key_bind: String,
    pub petting_enabled: bool,
    pub grow_up_enabled: bool,
    pub max_happiness_enabled: bool,
    pub max_fullness_enabled: bool,
    pub max_friendship_enabled: bool,
    pub harvest_enabled: bool,
    pub take_truffles_from_pigs: bool,
    pub enable_messages: bool,
    pub who_checks: String,
    pub cost_per_action: i64,
    pub chest_coords: Coord,
    pub bypass_inventory: bool,
    /// `itemId,x,y` entries separated by `|`
    pub chest_defs: String,
    pub dialogue_path: Option<String>,
}

impl Default for SitterConfig {
    fn default() -> Self {
        Self {
            key_bind: "O".to_string(),
            petting_enabled: true,
            grow_up_enabled: true,
            max_happiness_enabled: true,
            max_fullness_enabled: true,
            max_friendship_enabled: true,
            harvest_enabled: true,
            take_truffles_from_pigs: true,
            enable_messages: true,
            who_checks: "spouse".to_string(),
            cost_per_action: 0,
            chest_coords: Coord::new(73, 14),
            bypass_inventory: false,
            chest_defs: String::new(),
            dialogue_path: None,
        }
    }
}

impl SitterConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SitterError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SitterError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SITTER_COST})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SitterError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Turns player settings into the immutable settings of a run.
    ///
    /// Nothing in here fails: a bad key binding falls back to `O`, a negative cost becomes
    /// free, and broken chest entries are skipped. Each recovery is logged.
    pub fn to_run_configuration(&self) -> RunConfiguration {
        let key_binding = match self.key_bind.parse::<KeyBinding>() {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Error parsing key binding ({}). Defaulted to O", e);
                KeyBinding::default()
            }
        };

        let cost_per_action = if self.cost_per_action < 0 {
            tracing::warn!(
                "I'll do it for free, but I'm not paying YOU to take care of YOUR stinking animals!"
            );
            tracing::warn!("Setting cost_per_action to 0.");
            0
        } else {
            u32::try_from(self.cost_per_action).unwrap_or_else(|_| {
                tracing::warn!(
                    "cost_per_action {} is too large, capped at {}",
                    self.cost_per_action,
                    u32::MAX
                );
                u32::MAX
            })
        };

        let config = RunConfiguration {
            toggles: CareToggles {
                petting: self.petting_enabled,
                grow_up: self.grow_up_enabled,
                max_fullness: self.max_fullness_enabled,
                max_happiness: self.max_happiness_enabled,
                max_friendship: self.max_friendship_enabled,
                harvest: self.harvest_enabled,
            },
            take_truffles_from_pigs: self.take_truffles_from_pigs,
            messages_enabled: self.enable_messages,
            cost_per_action,
            reporter: Reporter::parse(&self.who_checks),
            bypass_inventory: self.bypass_inventory,
            default_chest: self.chest_coords,
            chests: parse_chest_defs(&self.chest_defs),
            key_binding,
            dialogue_path: self.dialogue_path.as_ref().map(PathBuf::from),
        };

        tracing::trace!(
            "chestCoords:{}, chest definitions: {}",
            config.default_chest,
            config.chests.len()
        );
        config
    }
}

impl Validate for SitterConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.dialogue_path {
            validate_path("dialogue_path", path)?;
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
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
who_checks = "Shane"
cost_per_action = 10
bypass_inventory = true
chest_defs = "176,70,14|430,71,14"
"#;

        let config = SitterConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.who_checks, "Shane");
        assert!(config.petting_enabled);
        assert_eq!(config.key_bind, "O");

        let run = config.to_run_configuration();
        assert_eq!(run.cost_per_action, 10);
        assert_eq!(run.reporter, Reporter::Character("Shane".to_string()));
        assert!(run.bypass_inventory);
        assert_eq!(run.chests.get(&430), Some(&Coord::new(71, 14)));
    }

    #[test]
    fn test_negative_cost_is_clamped() {
        let config = SitterConfig {
            cost_per_action: -25,
            ..SitterConfig::default()
        };
        assert_eq!(config.to_run_configuration().cost_per_action, 0);
    }

    #[test]
    fn test_bad_key_binding_falls_back() {
        let config = SitterConfig {
            key_bind: "not-a-key".to_string(),
            ..SitterConfig::default()
        };
        assert_eq!(config.to_run_configuration().key_binding, KeyBinding::Letter('O'));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SITTER_TEST_COST", "15");

        let config = SitterConfig::from_toml_str("cost_per_action = ${SITTER_TEST_COST}").unwrap();
        assert_eq!(config.cost_per_action, 15);

        std::env::remove_var("SITTER_TEST_COST");
    }

    #[test]
    fn test_config_validation() {
        let config = SitterConfig {
            dialogue_path: Some(String::new()),
            ..SitterConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(SitterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"key_bind = \"P\"\nenable_messages = false\n")
            .unwrap();

        let config = SitterConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.key_bind, "P");
        assert!(!config.enable_messages);
    }
}
