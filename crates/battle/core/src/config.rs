/// How long "infinite" control and damage-over-time effects last.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfiniteDurationPolicy {
    /// Uniform in `[min_infinite_duration, max_infinite_duration]`.
    #[default]
    Random,
    /// Always `max_infinite_duration`.
    Maximum,
}

/// Presentation delays in scene ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleTimings {
    /// Between "incoming" and "applied" portrait feedback of a processor.
    pub processor_delay: u64,
    /// Pause after a processor is applied, before the next wave starts.
    pub after_processor_delay: u64,
    /// Gate for defend / wait / retreat.
    pub instant_action_delay: u64,
}

impl BattleTimings {
    pub const DEFAULT_PROCESSOR_DELAY: u64 = 500;
    pub const DEFAULT_AFTER_PROCESSOR_DELAY: u64 = 250;
    pub const DEFAULT_INSTANT_ACTION_DELAY: u64 = 100;
}

impl Default for BattleTimings {
    fn default() -> Self {
        Self {
            processor_delay: Self::DEFAULT_PROCESSOR_DELAY,
            after_processor_delay: Self::DEFAULT_AFTER_PROCESSOR_DELAY,
            instant_action_delay: Self::DEFAULT_INSTANT_ACTION_DELAY,
        }
    }
}

/// Battle rule constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Upper bound (inclusive) of the random bonus added to damage.
    pub damage_random_bonus: u32,
    /// Critical hits add this percent of base power.
    pub critical_damage_percent: u32,
    /// Effective armor never exceeds this percent.
    pub max_armor: u32,
    /// Share of dealt damage a drain-life attacker recovers.
    pub drain_life_percent: u32,
    /// Hit points a revived unit returns with, in percent of maximum.
    pub revive_hit_points_percent: u32,
    /// Upper bound (inclusive) of the random initiative bonus per round.
    pub initiative_variance: u32,
    /// Duration of a regular damage-over-time effect.
    pub damage_over_time_duration: u32,
    pub min_infinite_duration: u32,
    pub max_infinite_duration: u32,
    pub infinite_duration_policy: InfiniteDurationPolicy,
    pub timings: BattleTimings,
}

impl BattleConfig {
    pub const DEFAULT_DAMAGE_RANDOM_BONUS: u32 = 5;
    pub const DEFAULT_CRITICAL_DAMAGE_PERCENT: u32 = 5;
    pub const DEFAULT_MAX_ARMOR: u32 = 90;
    pub const DEFAULT_DRAIN_LIFE_PERCENT: u32 = 50;
    pub const DEFAULT_REVIVE_HIT_POINTS_PERCENT: u32 = 50;
    pub const DEFAULT_INITIATIVE_VARIANCE: u32 = 10;
    pub const DEFAULT_DAMAGE_OVER_TIME_DURATION: u32 = 2;
    pub const DEFAULT_MIN_INFINITE_DURATION: u32 = 2;
    pub const DEFAULT_MAX_INFINITE_DURATION: u32 = 4;

    pub fn new() -> Self {
        Self {
            damage_random_bonus: Self::DEFAULT_DAMAGE_RANDOM_BONUS,
            critical_damage_percent: Self::DEFAULT_CRITICAL_DAMAGE_PERCENT,
            max_armor: Self::DEFAULT_MAX_ARMOR,
            drain_life_percent: Self::DEFAULT_DRAIN_LIFE_PERCENT,
            revive_hit_points_percent: Self::DEFAULT_REVIVE_HIT_POINTS_PERCENT,
            initiative_variance: Self::DEFAULT_INITIATIVE_VARIANCE,
            damage_over_time_duration: Self::DEFAULT_DAMAGE_OVER_TIME_DURATION,
            min_infinite_duration: Self::DEFAULT_MIN_INFINITE_DURATION,
            max_infinite_duration: Self::DEFAULT_MAX_INFINITE_DURATION,
            infinite_duration_policy: InfiniteDurationPolicy::default(),
            timings: BattleTimings::default(),
        }
    }

    pub fn with_infinite_duration_policy(mut self, policy: InfiniteDurationPolicy) -> Self {
        self.infinite_duration_policy = policy;
        self
    }

    pub fn with_timings(mut self, timings: BattleTimings) -> Self {
        self.timings = timings;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
