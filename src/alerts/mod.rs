/// Alert engine and rule definitions
pub mod alert_engine;
pub mod rules;

pub use alert_engine::AlertEngine;
pub use rules::{seed_rules, AlertPredicate, AlertRule};
