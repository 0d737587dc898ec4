//! Alert rule evaluation and trigger-state tracking
//!
//! The AlertEngine owns the mutable rule set and flips trigger state when the
//! current aggregates cross rule thresholds. It performs no polling of its
//! own: a caller-side scheduler is expected to invoke `evaluate_all` on each
//! aggregation tick.

use crate::alerts::rules::{seed_rules, AlertRule};
use crate::error::AlertError;
use crate::events::{DashboardStats, ServiceHealth};
use chrono::Utc;
use log::info;
use std::collections::BTreeMap;

/// Holds the mutable alert rule set, keyed by rule id
pub struct AlertEngine {
    rules: BTreeMap<String, AlertRule>,
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::with_seed_rules()
    }
}

impl AlertEngine {
    /// Create an engine from an explicit rule list
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self {
            rules: rules.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    /// Create an engine with the fixed seed rules
    pub fn with_seed_rules() -> Self {
        Self::new(seed_rules())
    }

    /// All rules ordered by id
    ///
    /// Ids are compared lexicographically, so a custom id like "10" lists
    /// before "2". Zero-pad numeric ids if that matters for display.
    pub fn list(&self) -> Vec<AlertRule> {
        self.rules.values().cloned().collect()
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&AlertRule> {
        self.rules.get(id)
    }

    /// Number of configured rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Set a rule's enabled flag and return the updated rule
    ///
    /// Disabling does not clear `triggered`: the breach state is frozen until
    /// the rule is re-enabled and re-evaluated.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::RuleNotFound` if no rule has the given id.
    pub fn toggle(&mut self, id: &str, enabled: bool) -> Result<AlertRule, AlertError> {
        let rule = self
            .rules
            .get_mut(id)
            .ok_or_else(|| AlertError::RuleNotFound(id.to_string()))?;
        rule.enabled = enabled;
        info!(
            "Alert rule '{}' ({}) {}",
            rule.name,
            rule.id,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(rule.clone())
    }

    /// Evaluate every enabled rule against the current aggregates
    ///
    /// On a false-to-true transition, `triggered` is set and `last_triggered`
    /// stamped; re-evaluating with an unchanged breach never restamps it. When
    /// a breach clears, `triggered` is reset but `last_triggered` is retained
    /// as history. Disabled rules are skipped entirely.
    pub fn evaluate_all(&mut self, stats: &DashboardStats, health: &[ServiceHealth]) {
        for rule in self.rules.values_mut() {
            if !rule.enabled {
                continue;
            }

            let breach = rule.predicate.breach(rule.threshold, stats, health);
            if breach && !rule.triggered {
                rule.triggered = true;
                rule.last_triggered = Some(Utc::now());
                info!(
                    "Alert '{}' triggered (threshold {}, severity {:?})",
                    rule.name, rule.threshold, rule.severity
                );
            } else if !breach && rule.triggered {
                rule.triggered = false;
                info!("Alert '{}' cleared", rule.name);
            }
        }
    }

    /// Rules currently in the triggered state, ordered by id
    pub fn triggered(&self) -> Vec<&AlertRule> {
        self.rules.values().filter(|r| r.triggered).collect()
    }
}
