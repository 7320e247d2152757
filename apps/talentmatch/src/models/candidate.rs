use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the ranking service. Some deployments send strings, others integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateId::Number(n) => write!(f, "{n}"),
            CandidateId::Text(s) => f.write_str(s),
        }
    }
}

/// One ranked candidate as returned by the ranking service.
///
/// `matched_skills` is a sample; `matched_skills_count` is reported independently
/// and may not equal its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<CandidateId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    pub final_score: f64,
    pub skills_score: f64,
    pub exp_score: f64,
    pub edu_score: f64,
    pub relevance_score: f64,
    pub ats_score: f64,
    pub matched_skills_count: u32,
    pub matched_skills: Vec<String>,
    pub experience: String,
}

impl CandidateResult {
    /// Name to show for the candidate at `rank_index` (zero-based).
    pub fn display_name(&self, rank_index: usize) -> String {
        match &self.candidate_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Candidate {}", rank_index + 1),
        }
    }
}

#[cfg(test)]
pub(crate) fn candidate(final_score: f64) -> CandidateResult {
    CandidateResult {
        candidate_id: None,
        candidate_name: None,
        final_score,
        skills_score: 0.0,
        exp_score: 0.0,
        edu_score: 0.0,
        relevance_score: 0.0,
        ats_score: 50.0,
        matched_skills_count: 0,
        matched_skills: vec![],
        experience: "0 Years".to_string(),
    }
}
