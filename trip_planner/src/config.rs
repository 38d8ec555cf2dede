use std::env;

pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set in the environment variables.")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`, loaded by the
/// binary before this runs).
#[derive(Clone)]
pub struct Config {
    pub tavily_api_key: String,
    pub openai_api_key: String,
    pub model: String,
    pub max_tool_rounds: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let max_tool_rounds = match get("TRIP_PLANNER_MAX_TOOL_ROUNDS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "TRIP_PLANNER_MAX_TOOL_ROUNDS",
                value: raw,
            })?,
            None => DEFAULT_MAX_TOOL_ROUNDS,
        };

        Ok(Self {
            tavily_api_key: require("TAVILY_API_KEY")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            model: get("TRIP_PLANNER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            max_tool_rounds,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("tavily_api_key", &"[REDACTED]")
            .field("openai_api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup(&[("TAVILY_API_KEY", "tv"), ("OPENAI_API_KEY", "oa")]))
                .unwrap();
        assert_eq!(config.tavily_api_key, "tv");
        assert_eq!(config.openai_api_key, "oa");
        assert_eq!(config.model, "gpt-4.1-nano");
        assert_eq!(config.max_tool_rounds, 8);
    }

    #[test]
    fn test_missing_keys() {
        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "oa")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TAVILY_API_KEY"));
        assert_eq!(
            err.to_string(),
            "TAVILY_API_KEY is not set in the environment variables."
        );

        let err = Config::from_lookup(lookup(&[("TAVILY_API_KEY", "tv"), ("OPENAI_API_KEY", " ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("OPENAI_API_KEY"));
    }

    #[test]
    fn test_overrides_and_invalid_rounds() {
        let config = Config::from_lookup(lookup(&[
            ("TAVILY_API_KEY", "tv"),
            ("OPENAI_API_KEY", "oa"),
            ("TRIP_PLANNER_MODEL", "gpt-4.1-mini"),
            ("TRIP_PLANNER_MAX_TOOL_ROUNDS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.max_tool_rounds, 3);

        let err = Config::from_lookup(lookup(&[
            ("TAVILY_API_KEY", "tv"),
            ("OPENAI_API_KEY", "oa"),
            ("TRIP_PLANNER_MAX_TOOL_ROUNDS", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { value, .. } if value == "many"));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config =
            Config::from_lookup(lookup(&[("TAVILY_API_KEY", "tv-secret"), ("OPENAI_API_KEY", "oa")]))
                .unwrap();
        assert!(!format!("{config:?}").contains("tv-secret"));
    }
}
