//! Load-to-color policy table.
//!
//! Rules are consulted in ascending threshold order and the first rule whose
//! threshold exceeds the load wins. The last rule is the fallback: its
//! threshold is never compared and it is selected whenever the load is at or
//! above every other threshold.
//!
//! Thresholds in [`DEFAULT_RULES`] are per core. [`ColorPolicy::build`]
//! multiplies them by the core count once, producing an immutable table that
//! is directly comparable to `/proc/loadavg` values.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::ConfigError;
use crate::state::{BlinkPattern, RingColor, VisualState};

use BlinkPattern::{FadeFast, None as Steady};
use RingColor::*;

/// Maximum brightness accepted by the driver
pub const MAX_BRIGHTNESS: u8 = 100;

/// One (threshold, visual state) entry of the policy table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RuleRepr", into = "RuleRepr")]
pub struct Rule {
    /// Exclusive upper bound on the load for this rule
    pub threshold: f64,
    pub state: VisualState,
}

/// Flat on-disk form of a [`Rule`]; unknown keys such as a misspelled
/// `blink` are rejected instead of silently defaulting.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleRepr {
    threshold: f64,
    color: RingColor,
    brightness: u8,
    #[serde(default)]
    blink: BlinkPattern,
}

impl From<RuleRepr> for Rule {
    fn from(repr: RuleRepr) -> Self {
        Rule::new(repr.threshold, repr.color, repr.brightness, repr.blink)
    }
}

impl From<Rule> for RuleRepr {
    fn from(rule: Rule) -> Self {
        Self {
            threshold: rule.threshold,
            color: rule.state.color,
            brightness: rule.state.brightness,
            blink: rule.state.blink,
        }
    }
}

impl Rule {
    pub const fn new(threshold: f64, color: RingColor, brightness: u8, blink: BlinkPattern) -> Self {
        Self {
            threshold,
            state: VisualState::new(color, brightness, blink),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}", self.threshold, self.state)
    }
}

/// Default per-core table. The first entry (idle) and the last entry
/// (overload fallback) both carry threshold 0 and must stay in this order.
pub const DEFAULT_RULES: [Rule; 12] = [
    Rule::new(0.0, White, 80, Steady),
    Rule::new(0.02, Blue, 10, Steady),
    Rule::new(0.05, Blue, 20, Steady),
    Rule::new(0.10, Blue, 40, Steady),
    Rule::new(0.15, Blue, 80, Steady),
    Rule::new(0.25, Cyan, 50, Steady),
    Rule::new(0.5, Green, 80, Steady),
    Rule::new(0.75, Yellow, 60, Steady),
    Rule::new(1.0, Pink, 60, Steady),
    Rule::new(2.0, Red, 80, Steady),
    Rule::new(4.0, Red, 100, Steady),
    Rule::new(0.0, Red, 100, FadeFast),
];

/// Scaled, read-only policy table
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPolicy {
    /// Compared rules, ascending
    rules: Vec<Rule>,
    fallback: Rule,
    cores: usize,
}

impl ColorPolicy {
    /// Validate `rules` and scale every threshold by `cores`.
    pub fn build(rules: &[Rule], cores: usize) -> Result<Self, ConfigError> {
        if cores == 0 {
            return Err(ConfigError::Cores);
        }
        let (fallback, compared) = rules.split_last().ok_or(ConfigError::EmptyTable)?;

        for (index, rule) in rules.iter().enumerate() {
            // A NaN threshold never equals itself, so every tick would write
            if !rule.threshold.is_finite() {
                return Err(ConfigError::Threshold { index });
            }
            if rule.state.brightness > MAX_BRIGHTNESS {
                return Err(ConfigError::Brightness {
                    index,
                    value: rule.state.brightness,
                });
            }
        }
        for (index, pair) in compared.windows(2).enumerate() {
            if matches!(
                pair[1].threshold.partial_cmp(&pair[0].threshold),
                Some(Ordering::Less) | None
            ) {
                return Err(ConfigError::Unsorted { index: index + 1 });
            }
        }

        let factor = cores as f64;
        let scale = |rule: &Rule| Rule {
            threshold: rule.threshold * factor,
            ..*rule
        };

        Ok(Self {
            rules: compared.iter().map(scale).collect(),
            fallback: scale(fallback),
            cores,
        })
    }

    /// Default table scaled for `cores`.
    pub fn with_defaults(cores: usize) -> Result<Self, ConfigError> {
        Self::build(&DEFAULT_RULES, cores)
    }

    /// Rule for `load`: the first whose threshold exceeds it, else the fallback.
    pub fn resolve(&self, load: f64) -> &Rule {
        self.rules
            .iter()
            .find(|rule| load < rule.threshold)
            .unwrap_or(&self.fallback)
    }

    /// All rules in table order, fallback last.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().chain(std::iter::once(&self.fallback))
    }

    pub fn fallback(&self) -> &Rule {
        &self.fallback
    }

    /// Core count the thresholds were scaled by
    pub fn cores(&self) -> usize {
        self.cores
    }
}

impl fmt::Display for ColorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            write!(f, "[{rule}] ")?;
        }
        write!(f, "[* {}]", self.fallback.state)
    }
}

/// Number of cores used to scale the table, 1 if it cannot be detected.
pub fn detect_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(color: RingColor, brightness: u8, blink: BlinkPattern) -> VisualState {
        VisualState::new(color, brightness, blink)
    }

    #[test]
    fn test_scaling_multiplies_thresholds() {
        let policy = ColorPolicy::with_defaults(4).unwrap();
        let scaled: Vec<f64> = policy.rules().map(|r| r.threshold).collect();
        for (scaled, original) in scaled.iter().zip(DEFAULT_RULES.iter()) {
            assert_eq!(*scaled, original.threshold * 4.0);
        }
        assert_eq!(policy.rules().count(), DEFAULT_RULES.len());
        assert_eq!(policy.cores(), 4);
    }

    #[test]
    fn test_build_does_not_touch_input() {
        let rules = DEFAULT_RULES;
        let _ = ColorPolicy::build(&rules, 8).unwrap();
        assert_eq!(rules, DEFAULT_RULES);
    }

    #[test]
    fn test_resolve_four_core_scenario() {
        let policy = ColorPolicy::with_defaults(4).unwrap();
        let expected = [
            (0.0, state(Blue, 10, Steady)),
            (0.3, state(Blue, 40, Steady)),
            (0.9, state(Cyan, 50, Steady)),
            (3.0, state(Pink, 60, Steady)),
        ];
        for (load, want) in expected {
            assert_eq!(policy.resolve(load).state, want, "load {load}");
        }
    }

    #[test]
    fn test_resolve_threshold_is_exclusive() {
        let policy = ColorPolicy::with_defaults(1).unwrap();
        assert_eq!(policy.resolve(0.5).state, state(Yellow, 60, Steady));
        assert_eq!(policy.resolve(0.49).state, state(Green, 80, Steady));
    }

    #[test]
    fn test_resolve_fallback_above_all_thresholds() {
        let policy = ColorPolicy::with_defaults(2).unwrap();
        assert_eq!(policy.resolve(8.0).state, state(Red, 100, FadeFast));
        assert_eq!(policy.resolve(f64::INFINITY).state, state(Red, 100, FadeFast));
        assert_eq!(policy.resolve(f64::NAN).state, state(Red, 100, FadeFast));
        assert_eq!(policy.resolve(7.99).state, state(Red, 100, Steady));
    }

    #[test]
    fn test_idle_entry_only_for_negative_load() {
        let policy = ColorPolicy::with_defaults(1).unwrap();
        assert_eq!(policy.resolve(-1.0).state, state(White, 80, Steady));
        assert_ne!(policy.resolve(0.0).state, state(White, 80, Steady));
    }

    #[test]
    fn test_resolve_matches_linear_scan() {
        let policy = ColorPolicy::with_defaults(3).unwrap();
        let table: Vec<Rule> = policy.rules().copied().collect();
        let (fallback, compared) = table.split_last().unwrap();
        for step in 0..2000 {
            let load = step as f64 * 0.01;
            let expected = compared
                .iter()
                .find(|r| r.threshold > load)
                .unwrap_or(fallback);
            assert_eq!(policy.resolve(load), expected, "load {load}");
        }
    }

    #[test]
    fn test_resolve_is_monotonic() {
        let policy = ColorPolicy::with_defaults(4).unwrap();
        let table: Vec<Rule> = policy.rules().copied().collect();
        let position = |load: f64| {
            let rule = policy.resolve(load);
            table.iter().position(|r| r == rule).unwrap()
        };

        let mut last = position(0.0);
        for step in 1..=5000 {
            let current = position(step as f64 * 0.005);
            assert!(current >= last, "went back from {last} to {current}");
            last = current;
        }
    }

    #[test]
    fn test_build_rejects_bad_tables() {
        assert!(matches!(
            ColorPolicy::build(&[], 1),
            Err(ConfigError::EmptyTable)
        ));
        assert!(matches!(
            ColorPolicy::build(&DEFAULT_RULES, 0),
            Err(ConfigError::Cores)
        ));

        let unsorted = [
            Rule::new(0.5, Green, 80, Steady),
            Rule::new(0.2, Blue, 80, Steady),
            Rule::new(0.0, Red, 100, FadeFast),
        ];
        assert!(matches!(
            ColorPolicy::build(&unsorted, 1),
            Err(ConfigError::Unsorted { index: 1 })
        ));

        let nan_fallback = [
            Rule::new(0.5, Green, 80, Steady),
            Rule::new(f64::NAN, Red, 100, FadeFast),
        ];
        assert!(matches!(
            ColorPolicy::build(&nan_fallback, 1),
            Err(ConfigError::Threshold { index: 1 })
        ));

        let lone_infinite = [
            Rule::new(f64::INFINITY, Green, 80, Steady),
            Rule::new(0.0, Red, 100, FadeFast),
        ];
        assert!(matches!(
            ColorPolicy::build(&lone_infinite, 1),
            Err(ConfigError::Threshold { index: 0 })
        ));

        let too_bright = [Rule::new(0.0, Red, 101, Steady)];
        assert!(matches!(
            ColorPolicy::build(&too_bright, 1),
            Err(ConfigError::Brightness { index: 0, value: 101 })
        ));
    }

    #[test]
    fn test_single_rule_table_is_all_fallback() {
        let policy = ColorPolicy::build(&[Rule::new(3.0, Green, 50, Steady)], 2).unwrap();
        assert_eq!(policy.resolve(0.0).state, state(Green, 50, Steady));
        assert_eq!(policy.resolve(100.0).state, state(Green, 50, Steady));
    }
}
