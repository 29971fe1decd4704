//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`BattleConfig::default`], so a file only
    /// needs the values it overrides.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &BattleConfig) -> LoadResult<()> {
        if config.min_infinite_duration == 0 {
            anyhow::bail!("min_infinite_duration must be at least 1");
        }
        if config.min_infinite_duration > config.max_infinite_duration {
            anyhow::bail!(
                "min_infinite_duration ({}) exceeds max_infinite_duration ({})",
                config.min_infinite_duration,
                config.max_infinite_duration
            );
        }
        if config.max_armor > 100 {
            anyhow::bail!("max_armor must be a percentage, got {}", config.max_armor);
        }
        for (name, value) in [
            ("damage_random_bonus", config.damage_random_bonus),
            ("initiative_variance", config.initiative_variance),
        ] {
            if value > 100 {
                anyhow::bail!("{} must be at most 100, got {}", name, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use battle_core::InfiniteDurationPolicy;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ConfigLoader::parse("").unwrap();
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn overrides_rules_and_timings() {
        let config = ConfigLoader::parse(
            r#"
            max_armor = 75
            infinite_duration_policy = "Maximum"

            [timings]
            processor_delay = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.max_armor, 75);
        assert_eq!(config.infinite_duration_policy, InfiniteDurationPolicy::Maximum);
        assert_eq!(config.timings.processor_delay, 300);
        assert_eq!(
            config.timings.after_processor_delay,
            battle_core::BattleTimings::DEFAULT_AFTER_PROCESSOR_DELAY
        );
    }

    #[test]
    fn rejects_inverted_infinite_range() {
        let err = ConfigLoader::parse("min_infinite_duration = 5\nmax_infinite_duration = 3").unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn rejects_unbounded_random_spreads() {
        let err = ConfigLoader::parse("initiative_variance = 4294967295").unwrap_err();
        assert!(err.to_string().contains("initiative_variance"));
        let err = ConfigLoader::parse("damage_random_bonus = 101").unwrap_err();
        assert!(err.to_string().contains("damage_random_bonus"));
    }
}
