//! GitHub pull request review payload renderer.
//!
//! Prints the body of `POST /pulls/{n}/reviews` with every planned inline
//! comment attached, for dry runs and piping into other tooling.

use serde_json::{Value, json};

use crate::github::client::{inline_payload, review_payload};
use crate::models::EmissionPlan;
use crate::output::PlanRenderer;

/// Review payload renderer.
#[derive(Debug, Default)]
pub struct GithubRenderer {
    pub commit_id: Option<String>,
}

impl PlanRenderer for GithubRenderer {
    fn render(&self, plan: &EmissionPlan) -> String {
        let comments: Vec<Value> = plan
            .comments
            .iter()
            .map(|c| {
                let mut payload = inline_payload(c, "");
                if let Some(obj) = payload.as_object_mut() {
                    obj.remove("commit_id");
                }
                payload
            })
            .collect();

        let mut review = review_payload(&plan.summary, self.commit_id.as_deref());
        review["comments"] = json!(comments);
        serde_json::to_string_pretty(&review).unwrap_or_else(|_| "{}".to_string())
    }
}
