use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Ordinal weighting hint for one ranking criterion.
/// Passed to the ranking service by name; no numeric weight exists client-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriorityLevel {
    Ignore,
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 5] = [
        PriorityLevel::Ignore,
        PriorityLevel::Low,
        PriorityLevel::Medium,
        PriorityLevel::High,
        PriorityLevel::Critical,
    ];

    /// The exact name the ranking service expects.
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::Ignore => "Ignore",
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
            PriorityLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid priority '{0}': must be one of Ignore | Low | Medium | High | Critical")]
pub struct ParsePriorityError(pub String);

impl FromStr for PriorityLevel {
    type Err = ParsePriorityError;

    /// Exact, case-sensitive match on the five level names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriorityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParsePriorityError(s.to_string()))
    }
}

/// The four criteria the ranking service weighs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    Skills,
    Experience,
    Education,
    Relevance,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Skills,
        Criterion::Experience,
        Criterion::Education,
        Criterion::Relevance,
    ];

    /// Multipart field carrying this criterion's level.
    pub fn field_name(self) -> &'static str {
        match self {
            Criterion::Skills => "skills_priority",
            Criterion::Experience => "experience_priority",
            Criterion::Education => "education_priority",
            Criterion::Relevance => "relevance_priority",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Skills => "Skills Match",
            Criterion::Experience => "Yrs Experience",
            Criterion::Education => "Education",
            Criterion::Relevance => "Semantic Match",
        }
    }
}

/// One level per criterion. All four are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriorityConfiguration {
    pub skills: PriorityLevel,
    pub experience: PriorityLevel,
    pub education: PriorityLevel,
    pub relevance: PriorityLevel,
}

impl PriorityConfiguration {
    pub fn level(&self, criterion: Criterion) -> PriorityLevel {
        match criterion {
            Criterion::Skills => self.skills,
            Criterion::Experience => self.experience,
            Criterion::Education => self.education,
            Criterion::Relevance => self.relevance,
        }
    }

    pub fn set_level(&mut self, criterion: Criterion, level: PriorityLevel) {
        let slot = match criterion {
            Criterion::Skills => &mut self.skills,
            Criterion::Experience => &mut self.experience,
            Criterion::Education => &mut self.education,
            Criterion::Relevance => &mut self.relevance,
        };
        *slot = level;
    }

    /// `(field_name, level_name)` pairs in a fixed criterion order.
    pub fn form_fields(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        Criterion::ALL
            .into_iter()
            .map(|c| (c.field_name(), self.level(c).as_str()))
    }

    /// Number of criteria not set to `Ignore`.
    pub fn active_criteria(&self) -> usize {
        Criterion::ALL
            .into_iter()
            .filter(|c| self.level(*c) != PriorityLevel::Ignore)
            .count()
    }
}
