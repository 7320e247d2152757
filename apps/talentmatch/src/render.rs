use std::fmt::Write;

use talentmatch::results::{AggregateMetrics, ResultSet, RowExpansionState};

/// The four-number summary printed above the rankings.
pub fn metrics_block(metrics: &AggregateMetrics, active_criteria: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analysis Report (ranking based on {active_criteria} active criteria)");
    let _ = writeln!(out, "  Top Match      {}%", metrics.top_score);
    let _ = writeln!(out, "  Average Match  {:.1}%", metrics.mean_score_display());
    let _ = writeln!(out, "  Candidates     {}", metrics.count);
    let _ = write!(out, "  Avg ATS Score  {:.1}%", metrics.mean_ats_display());
    out
}

/// One line per candidate, best first. Collapsed rows end their skill list with "+N more".
pub fn rankings_table(results: &ResultSet, expansion: &RowExpansionState) -> String {
    let mut out = String::from(
        "Rank | Candidate | Match % | ATS % | Skills Match | Experience | Matched Skills | \
         Skills Score | Exp Score | Edu Score | Relevance",
    );

    for (index, candidate) in results.iter().enumerate() {
        let key = results.row_key(index);
        let mut skills = expansion.visible_skills(&key, candidate).join(", ");
        let hidden = expansion.hidden_skill_count(&key, candidate);
        if hidden > 0 {
            let _ = write!(skills, " +{hidden} more");
        }

        let _ = write!(
            out,
            "\n{} | {} | {}% | {}% | {} | {} | {} | {} | {} | {} | {}",
            index + 1,
            candidate.display_name(index),
            candidate.final_score,
            candidate.ats_score,
            candidate.matched_skills_count,
            candidate.experience,
            skills,
            candidate.skills_score,
            candidate.exp_score,
            candidate.edu_score,
            candidate.relevance_score,
        );
    }

    out
}
