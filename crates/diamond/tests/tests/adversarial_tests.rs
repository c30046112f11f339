#[path = "adversarial/unauthorized.rs"]
mod unauthorized;

#[path = "adversarial/timing.rs"]
mod timing;

#[path = "adversarial/malformed_cuts.rs"]
mod malformed_cuts;
