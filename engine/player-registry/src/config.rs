use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for name resolution in the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Minimum fuzzy-match score accepted when resolving an unknown name
    pub fuzzy_min_score: i64,

    /// Generational suffixes stripped before retrying an exact lookup
    pub name_suffixes: Vec<String>,

    /// First-name aliases tried before fuzzy matching (e.g. "Marquise" -> "Hollywood")
    pub first_name_aliases: Vec<(String, String)>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fuzzy_min_score: 50,
            name_suffixes: [" Jr.", " Sr.", " III", " II"].iter().map(|s| s.to_string()).collect(),
            first_name_aliases: vec![("Marquise".to_string(), "Hollywood".to_string())],
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from a variable lookup. Unparsable values are errors.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(score) = var("REGISTRY_FUZZY_MIN_SCORE") {
            config.fuzzy_min_score = score.trim().parse().map_err(|e| {
                RegistryError::Config(format!("invalid REGISTRY_FUZZY_MIN_SCORE '{score}': {e}"))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars() {
        let config = RegistryConfig::from_vars(|key| (key == "REGISTRY_FUZZY_MIN_SCORE").then(|| "80".to_string())).unwrap();
        assert_eq!(config.fuzzy_min_score, 80);
        assert_eq!(RegistryConfig::from_vars(|_| None).unwrap().fuzzy_min_score, 50);

        let result = RegistryConfig::from_vars(|key| (key == "REGISTRY_FUZZY_MIN_SCORE").then(|| "high".to_string()));
        assert!(matches!(result, Err(RegistryError::Config(_))));
    }
}
