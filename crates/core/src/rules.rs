//! Violation rules and the component-to-rule mapping.
//!
//! A rule decides whether a single [`Reading`] breaches its limits. Rules are
//! stateless; all windowing and de-duplication lives in
//! [`crate::tracker::ViolationTracker`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::alert::Severity;
use crate::component_names::{COMPONENT_BATT, COMPONENT_TSTAT};
use crate::error::CoreError;
use crate::reading::Reading;

/// Decides whether a reading is a violation and which severity applies.
pub trait ViolationRule: fmt::Debug + Send + Sync {
    /// Returns the severity if the reading violates the rule, `None` otherwise.
    fn evaluate(&self, reading: &Reading) -> Option<Severity>;
}

// ---------------------------------------------------------------------------
// Built-in rules
// ---------------------------------------------------------------------------

/// Violation when the raw value is strictly below the red-low limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedLowRule;

impl ViolationRule for RedLowRule {
    fn evaluate(&self, reading: &Reading) -> Option<Severity> {
        (reading.raw_value < reading.red_low_limit).then_some(Severity::RedLow)
    }
}

/// Violation when the raw value is strictly above the red-high limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedHighRule;

impl ViolationRule for RedHighRule {
    fn evaluate(&self, reading: &Reading) -> Option<Severity> {
        (reading.raw_value > reading.red_high_limit).then_some(Severity::RedHigh)
    }
}

// ---------------------------------------------------------------------------
// RuleKind
// ---------------------------------------------------------------------------

/// Names of the built-in rules, used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    RedLow,
    RedHigh,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::RedLow => "red_low",
            RuleKind::RedHigh => "red_high",
        }
    }

    /// Instantiate the rule this kind names.
    pub fn build(&self) -> Box<dyn ViolationRule> {
        match self {
            RuleKind::RedLow => Box::new(RedLowRule),
            RuleKind::RedHigh => Box::new(RedHighRule),
        }
    }
}

impl FromStr for RuleKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red_low" => Ok(RuleKind::RedLow),
            "red_high" => Ok(RuleKind::RedHigh),
            other => Err(CoreError::Validation(format!(
                "unknown rule '{other}', expected 'red_low' or 'red_high'"
            ))),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RuleMapping
// ---------------------------------------------------------------------------

/// Component-to-rule mapping by name, as read from configuration.
///
/// Unlike [`RuleSet`] this is plain data: it can be cloned, compared and
/// printed back in the form it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleMapping {
    entries: Vec<(String, RuleKind)>,
}

impl RuleMapping {
    /// Battery readings alert low, thermostat readings alert high.
    pub fn with_defaults() -> Self {
        Self {
            entries: vec![
                (COMPONENT_BATT.to_string(), RuleKind::RedLow),
                (COMPONENT_TSTAT.to_string(), RuleKind::RedHigh),
            ],
        }
    }

    /// Parse `COMPONENT=rule` entries separated by commas.
    ///
    /// Empty entries are skipped. A later entry for the same component
    /// replaces an earlier one.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut mapping = Self::default();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (component, kind) = entry.split_once('=').ok_or_else(|| {
                CoreError::Validation(format!(
                    "rule mapping entry '{entry}' must have the form COMPONENT=rule"
                ))
            })?;
            let component = component.trim();
            if component.is_empty() {
                return Err(CoreError::Validation(format!(
                    "rule mapping entry '{entry}' has an empty component name"
                )));
            }
            mapping.set(component, kind.parse()?);
        }
        Ok(mapping)
    }

    fn set(&mut self, component: &str, kind: RuleKind) {
        match self.entries.iter_mut().find(|(name, _)| name == component) {
            Some(entry) => entry.1 = kind,
            None => self.entries.push((component.to_string(), kind)),
        }
    }

    pub fn entries(&self) -> &[(String, RuleKind)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiate one rule per entry.
    pub fn build(&self) -> RuleSet {
        let mut rules = RuleSet::new();
        for (component, kind) in &self.entries {
            rules.insert(component.as_str(), kind.build());
        }
        rules
    }
}

impl FromStr for RuleMapping {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (component, kind)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{component}={kind}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Mapping from component name to the rule that evaluates its readings.
///
/// Components without an entry are never evaluated.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: HashMap<String, Box<dyn ViolationRule>>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Battery readings alert low, thermostat readings alert high.
    pub fn with_defaults() -> Self {
        let mut rules = Self::new();
        rules.insert(COMPONENT_BATT, Box::new(RedLowRule));
        rules.insert(COMPONENT_TSTAT, Box::new(RedHighRule));
        rules
    }

    /// Parse a mapping of the form `BATT=red_low,TSTAT=red_high`.
    ///
    /// See [`RuleMapping::parse`] for the accepted syntax.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Ok(RuleMapping::parse(raw)?.build())
    }

    /// Register (or replace) the rule for a component.
    pub fn insert(&mut self, component: impl Into<String>, rule: Box<dyn ViolationRule>) {
        self.rules.insert(component.into(), rule);
    }

    /// Rule configured for `component`, if any.
    pub fn get(&self, component: &str) -> Option<&dyn ViolationRule> {
        self.rules.get(component).map(|r| r.as_ref())
    }

    pub fn contains(&self, component: &str) -> bool {
        self.rules.contains_key(component)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Configured component names, sorted for stable logging.
    pub fn components(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn make_reading(component: &str, raw_value: f64) -> Reading {
        Reading {
            timestamp: Utc::now(),
            satellite_id: 1000,
            red_high_limit: 101.0,
            yellow_high_limit: 98.0,
            yellow_low_limit: 25.0,
            red_low_limit: 20.0,
            raw_value,
            component: component.to_string(),
        }
    }

    #[test]
    fn red_low_fires_below_limit() {
        assert_matches!(
            RedLowRule.evaluate(&make_reading("BATT", 19.9)),
            Some(Severity::RedLow)
        );
    }

    #[test]
    fn red_low_ignores_value_at_limit() {
        assert_eq!(RedLowRule.evaluate(&make_reading("BATT", 20.0)), None);
        assert_eq!(RedLowRule.evaluate(&make_reading("BATT", 50.0)), None);
    }

    #[test]
    fn red_high_fires_above_limit() {
        assert_matches!(
            RedHighRule.evaluate(&make_reading("TSTAT", 101.5)),
            Some(Severity::RedHigh)
        );
    }

    #[test]
    fn red_high_ignores_value_at_limit() {
        assert_eq!(RedHighRule.evaluate(&make_reading("TSTAT", 101.0)), None);
        assert_eq!(RedHighRule.evaluate(&make_reading("TSTAT", -5.0)), None);
    }

    #[test]
    fn red_rules_ignore_yellow_limits() {
        // Between yellow and red on both sides.
        assert_eq!(RedLowRule.evaluate(&make_reading("BATT", 22.0)), None);
        assert_eq!(RedHighRule.evaluate(&make_reading("TSTAT", 99.0)), None);
    }

    #[test]
    fn default_rule_set_maps_known_components() {
        let rules = RuleSet::with_defaults();
        assert_eq!(rules.components(), vec!["BATT", "TSTAT"]);

        let batt = rules.get(COMPONENT_BATT).expect("BATT should be mapped");
        assert_matches!(batt.evaluate(&make_reading("BATT", 1.0)), Some(Severity::RedLow));

        let tstat = rules.get(COMPONENT_TSTAT).expect("TSTAT should be mapped");
        assert_matches!(
            tstat.evaluate(&make_reading("TSTAT", 200.0)),
            Some(Severity::RedHigh)
        );

        assert!(rules.get("GYRO").is_none());
    }

    #[test]
    fn parse_builds_mapping() {
        let rules = RuleSet::parse(" BATT = red_low , GYRO=RED_HIGH,, ").expect("should parse");
        assert_eq!(rules.len(), 2);
        assert_matches!(
            rules.get("GYRO").and_then(|r| r.evaluate(&make_reading("GYRO", 500.0))),
            Some(Severity::RedHigh)
        );
        assert!(rules.contains("BATT"));
    }

    #[test]
    fn parse_empty_string_yields_empty_set() {
        let rules = RuleSet::parse("").expect("should parse");
        assert!(rules.is_empty());
    }

    #[test]
    fn parse_rejects_unknown_rule() {
        assert_matches!(RuleSet::parse("BATT=yellow_low"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_rejects_entry_without_separator() {
        assert_matches!(RuleSet::parse("BATT"), Err(CoreError::Validation(_)));
        assert_matches!(RuleSet::parse("=red_low"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn mapping_replaces_duplicate_components_in_place() {
        let mapping = RuleMapping::parse("BATT=red_low, TSTAT=red_high, BATT=red_high").unwrap();
        assert_eq!(
            mapping.entries(),
            &[
                ("BATT".to_string(), RuleKind::RedHigh),
                ("TSTAT".to_string(), RuleKind::RedHigh),
            ]
        );
        assert_eq!(mapping.to_string(), "BATT=red_high,TSTAT=red_high");
    }

    #[test]
    fn default_mapping_matches_default_rule_set() {
        let mapping = RuleMapping::with_defaults();
        assert_eq!(mapping.to_string(), "BATT=red_low,TSTAT=red_high");
        assert_eq!(
            mapping.build().components(),
            RuleSet::with_defaults().components()
        );
    }

    #[test]
    fn rule_kind_round_trips_through_display() {
        for kind in [RuleKind::RedLow, RuleKind::RedHigh] {
            assert_eq!(kind.to_string().parse::<RuleKind>().unwrap(), kind);
        }
    }
}
