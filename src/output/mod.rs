//! Output renderers for an emission plan: terminal, JSON, GitHub review payload.

pub mod github;
pub mod json;
pub mod terminal;

use crate::models::EmissionPlan;

/// Trait for rendering an emission plan to an output format.
pub trait PlanRenderer {
    /// Render the plan to a string.
    fn render(&self, plan: &EmissionPlan) -> String;
}
