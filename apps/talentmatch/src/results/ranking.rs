use crate::errors::ScanError;
use crate::models::{CandidateId, CandidateResult};

/// How many ranked candidates a scan keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TopN(usize);

impl TopN {
    pub const MIN: usize = 1;
    pub const MAX: usize = 20;
    pub const DEFAULT: usize = 5;

    pub fn new(n: usize) -> Result<Self, ScanError> {
        if !(Self::MIN..=Self::MAX).contains(&n) {
            return Err(ScanError::Validation(format!(
                "top candidates must be between {} and {}, got {n}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(n))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Identity of a row within the currently rendered result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Id(CandidateId),
    /// Fallback for candidates without an identifier. Only stable for one result set.
    Position(usize),
}

/// Candidates from one successful scan, best first, already truncated to top-N.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    candidates: Vec<CandidateResult>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[CandidateResult] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateResult> {
        self.candidates.iter()
    }

    /// Key for the row at `index`: the candidate's identifier when present, else the position.
    pub fn row_key(&self, index: usize) -> RowKey {
        match self.candidates.get(index).and_then(|c| c.candidate_id.clone()) {
            Some(id) => RowKey::Id(id),
            None => RowKey::Position(index),
        }
    }
}

/// Sorts by `final_score` descending, then keeps the first `top_n`.
///
/// The sort is stable: candidates with equal scores stay in the order the service sent them.
pub fn rank(mut raw: Vec<CandidateResult>, top_n: TopN) -> ResultSet {
    raw.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    raw.truncate(top_n.get());
    ResultSet { candidates: raw }
}
