//! JSON output renderer.
//!
//! Serializes the whole plan: summary, comments, overflow, fallback.

use crate::models::EmissionPlan;
use crate::output::PlanRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl PlanRenderer for JsonRenderer {
    fn render(&self, plan: &EmissionPlan) -> String {
        serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_string())
    }
}
