use crate::streak::StreakPolicy;
use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_DATA_PATH: &str = "data/habits.json";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub streak_policy: StreakPolicy,
}

impl Config {
    /// `HABITS_DATA_PATH`, `PORT` and `HABITS_STREAK_POLICY`, each optional.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_path = lookup("HABITS_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let streak_policy = match lookup("HABITS_STREAK_POLICY") {
            Some(raw) => raw.parse().unwrap_or_else(|err: String| {
                warn!("{err}, falling back to longest");
                StreakPolicy::Longest
            }),
            None => StreakPolicy::default(),
        };

        Self {
            data_path,
            port,
            streak_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.data_path, PathBuf::from("data/habits.json"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.streak_policy, StreakPolicy::Longest);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("HABITS_DATA_PATH", "/tmp/h.json"),
            ("PORT", "9000"),
            ("HABITS_STREAK_POLICY", "current"),
        ]);
        assert_eq!(config.data_path, PathBuf::from("/tmp/h.json"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.streak_policy, StreakPolicy::Current);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[("PORT", "nope"), ("HABITS_STREAK_POLICY", "weekly")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.streak_policy, StreakPolicy::Longest);
    }
}
