#[path = "e2e/cache_regression.rs"]
mod cache_regression;

#[path = "e2e/upgrade_lifecycle.rs"]
mod upgrade_lifecycle;

#[path = "e2e/replace_revert.rs"]
mod replace_revert;

#[path = "e2e/timelock_gating.rs"]
mod timelock_gating;

#[path = "e2e/batch_atomicity.rs"]
mod batch_atomicity;

#[path = "e2e/config_and_events.rs"]
mod config_and_events;
