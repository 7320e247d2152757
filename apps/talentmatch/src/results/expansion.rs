use std::collections::HashMap;

use crate::models::CandidateResult;
use crate::results::ranking::RowKey;

/// Matched-skill tags shown for a collapsed row.
pub const COLLAPSED_SKILL_LIMIT: usize = 4;

/// Per-row "show all skills" flags for the rendered result set.
/// Rows that were never toggled are collapsed.
#[derive(Debug, Clone, Default)]
pub struct RowExpansionState {
    expanded: HashMap<RowKey, bool>,
}

impl RowExpansionState {
    pub fn toggle(&mut self, key: RowKey) -> bool {
        let flag = self.expanded.entry(key).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    /// Forgets every flag. Called when a new result set replaces the rendered one.
    pub fn reset(&mut self) {
        self.expanded.clear();
    }

    pub fn visible_skills<'a>(&self, key: &RowKey, candidate: &'a CandidateResult) -> &'a [String] {
        let skills = candidate.matched_skills.as_slice();
        if self.is_expanded(key) {
            skills
        } else {
            &skills[..skills.len().min(COLLAPSED_SKILL_LIMIT)]
        }
    }

    /// Count behind the "+N more" badge. Zero when expanded or nothing is hidden.
    pub fn hidden_skill_count(&self, key: &RowKey, candidate: &CandidateResult) -> usize {
        candidate.matched_skills.len() - self.visible_skills(key, candidate).len()
    }
}
