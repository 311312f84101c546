use crate::core::stats::RunStatistics;
use crate::utils::error::{Result, SitterError};
use crate::utils::validation::Validate;
use rand::Rng;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const XDIALOG: &str = "xdialog";
pub const GREETING: &str = "greeting";
pub const UNFINISHED_MONEY: &str = "unfinishedmoney";
pub const SMALLTALK: &str = "smalltalk";

/// Indices into the `xdialog` category.
pub mod xdialog {
    pub const SPOUSE_MARRIED: u32 = 1;
    pub const SPOUSE_UNMARRIED: u32 = 2;
    pub const PAYMENT: u32 = 3;
    pub const GATHERING_ONLY: u32 = 4;
    pub const CHARACTER_REPORT: u32 = 5;
    pub const CHARACTER_PAID: u32 = 6;
    pub const GENERIC_REPORT: u32 = 7;
    pub const SHORTFALL: u32 = 8;

    pub const REQUIRED: [u32; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
}

const BUILTIN_CATALOG: &str = include_str!("../../assets/dialogue.toml");

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    portraits: HashMap<String, String>,
    #[serde(flatten)]
    categories: HashMap<String, BTreeMap<String, String>>,
}

/// Values the `%token` placeholders are replaced with.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    pub stats: RunStatistics,
    pub actions: u32,
    pub total_cost: u64,
    pub cost_per_action: u32,
    pub checker: String,
    pub spouse: Option<String>,
    pub farmer: String,
    pub short_days: u32,
}

impl TemplateValues {
    fn lookup(&self, token: &str) -> Option<String> {
        let value = match token {
            "petted" => self.stats.animals_pet.to_string(),
            "aged" => self.stats.aged.to_string(),
            "fed" => self.stats.fed.to_string(),
            "happiness" => self.stats.max_happiness.to_string(),
            "friendship" => self.stats.max_friendship.to_string(),
            "truffles" => self.stats.truffles_harvested.to_string(),
            "products" => self.stats.products_harvested.to_string(),
            "actions" => self.actions.to_string(),
            "cost" => self.total_cost.to_string(),
            "costPerAction" => self.cost_per_action.to_string(),
            "checker" => self.checker.clone(),
            "spouse" => self
                .spouse
                .clone()
                .unwrap_or_else(|| self.checker.clone()),
            "farmer" => self.farmer.clone(),
            "shortDays" => self.short_days.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Message templates grouped by category and index.
#[derive(Debug, Clone)]
pub struct DialogueCatalog {
    categories: HashMap<String, BTreeMap<u32, String>>,
    portraits: HashMap<String, String>,
    token_pattern: Regex,
}

impl DialogueCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawCatalog = toml::from_str(content)?;

        let mut categories = HashMap::new();
        for (category, entries) in raw.categories {
            let mut indexed = BTreeMap::new();
            for (key, text) in entries {
                let index = key.parse::<u32>().map_err(|_| SitterError::CatalogError {
                    category: category.clone(),
                    message: format!("'{}' is not a numeric index", key),
                })?;
                indexed.insert(index, text);
            }
            categories.insert(category.to_lowercase(), indexed);
        }

        let token_pattern =
            Regex::new(r"%([A-Za-z]+)").map_err(|e| SitterError::CatalogError {
                category: "tokens".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            categories,
            portraits: raw.portraits,
            token_pattern,
        })
    }

    pub fn message_at(&self, index: u32, category: &str) -> &str {
        match self
            .categories
            .get(category)
            .and_then(|entries| entries.get(&index))
        {
            Some(text) => text,
            None => {
                tracing::warn!("No message {} in dialogue category [{}]", index, category);
                ""
            }
        }
    }

    pub fn random_message<R: Rng>(&self, category: &str, rng: &mut R) -> &str {
        let Some(entries) = self.categories.get(category).filter(|e| !e.is_empty()) else {
            tracing::warn!("Dialogue category [{}] is empty", category);
            return "";
        };

        let pick = rng.random_range(0..entries.len());
        entries.values().nth(pick).map(String::as_str).unwrap_or_default()
    }

    /// Opaque portrait token for a character, passed through to the dialogue box untouched.
    pub fn portrait_for(&self, name: &str) -> &str {
        self.portraits.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Swaps every known `%token` for its value. Unknown tokens stay as written.
    pub fn perform_replacement(&self, template: &str, values: &TemplateValues) -> String {
        self.token_pattern
            .replace_all(template, |caps: &Captures| {
                values
                    .lookup(&caps[1])
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Validate for DialogueCatalog {
    fn validate(&self) -> Result<()> {
        for index in xdialog::REQUIRED {
            let present = self
                .categories
                .get(XDIALOG)
                .is_some_and(|entries| entries.contains_key(&index));
            if !present {
                return Err(SitterError::CatalogError {
                    category: XDIALOG.to_string(),
                    message: format!("missing message {}", index),
                });
            }
        }

        for category in [GREETING, UNFINISHED_MONEY, SMALLTALK] {
            if self.categories.get(category).map_or(true, BTreeMap::is_empty) {
                return Err(SitterError::CatalogError {
                    category: category.to_string(),
                    message: "needs at least one message".to_string(),
                });
            }
        }

        Ok(())
    }
}
