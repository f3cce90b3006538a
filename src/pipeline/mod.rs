//! One linear planning pass per pull request.
//!
//! For each changed file: anchor candidates from its hunks, sections and
//! rule matches from its after content, document parts from the review
//! text. Rule parts go ahead of document parts; the merged list is mapped
//! to anchors and the results are capped into an [`EmissionPlan`].

use indexmap::IndexSet;
use tracing::{debug, info};

use crate::assemble::{Limits, assemble};
use crate::config::Config;
use crate::constants::DEFAULT_BOT_MARKER;
use crate::diff::AnchorIndex;
use crate::document::{DocumentLayout, review_parts};
use crate::mapping::map_file;
use crate::models::{ChangedFile, EmissionPlan, ReviewPart};
use crate::rules::RuleSet;
use crate::sections::sectionize;

/// Planning settings; the stages themselves are stateless.
#[derive(Debug, Clone)]
pub struct ReviewPipeline {
    pub layout: DocumentLayout,
    pub rules: RuleSet,
    pub limits: Limits,
    pub bot_marker: String,
}

impl Default for ReviewPipeline {
    fn default() -> Self {
        Self {
            layout: DocumentLayout::default(),
            rules: RuleSet::all(),
            limits: Limits::default(),
            bot_marker: DEFAULT_BOT_MARKER.to_string(),
        }
    }
}

impl ReviewPipeline {
    pub fn from_config(config: &Config) -> Self {
        Self {
            layout: config.document,
            rules: config.rules.rule_set(),
            limits: config.limits.clamped(),
            bot_marker: config.review.bot_marker.clone(),
        }
    }

    /// Plan comments for `files` from the review `document`.
    ///
    /// Repeated paths keep their first entry. No files yields an empty plan.
    pub fn plan(&self, files: &[ChangedFile], document: &str) -> EmissionPlan {
        let mut seen = IndexSet::new();
        let files: Vec<&ChangedFile> = files.iter().filter(|f| seen.insert(f.path.as_str())).collect();
        if files.is_empty() {
            info!("no relevant files to review");
            return EmissionPlan::empty();
        }

        let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        let mut doc_parts = review_parts(document, &paths, &self.layout);

        let mut mapped = Vec::new();
        for file in &files {
            let mut parts = self.rule_parts(file);
            parts.extend(doc_parts.shift_remove(&file.path).unwrap_or_default());

            let index = AnchorIndex::from_hunks(&file.hunks);
            debug!(
                path = %file.path,
                parts = parts.len(),
                candidates = index.candidates().len(),
                "mapping file"
            );
            mapped.extend(map_file(&parts, &index, file.content.as_deref(), &self.bot_marker));
        }

        assemble(mapped, files.len(), self.limits)
    }

    fn rule_parts(&self, file: &ChangedFile) -> Vec<ReviewPart> {
        let Some(content) = file.content.as_deref() else {
            debug!(path = %file.path, "no content, skipping rule checks");
            return Vec::new();
        };
        self.rules
            .check(content, &sectionize(content))
            .into_iter()
            .map(|m| m.into_part(&file.path))
            .collect()
    }
}
