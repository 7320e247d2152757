//! Scan Session: the single in-memory session a front end drives.
//!
//! Lifecycle: `Idle → Submitting → Idle` (with a fresh result set or with an error).
//! A trigger while `Submitting` is ignored, so at most one scan is ever in flight.
//! A failed scan never touches the result set from the previous successful one.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::ScanError;
use crate::intake::{FileSet, ScanRequest, SubmittedFile};
use crate::models::{CandidateResult, Criterion, PriorityConfiguration, PriorityLevel};
use crate::results::{
    compute_metrics, rank, to_delimited_text, AggregateMetrics, ResultSet, RowExpansionState,
    TopN,
};
use crate::scan_client::RankingService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// Handed out when a scan starts; carries the inputs captured at trigger time.
#[derive(Debug)]
pub struct ScanTicket {
    request: ScanRequest,
    top_n: TopN,
    generation: u64,
}

impl ScanTicket {
    pub fn request(&self) -> &ScanRequest {
        &self.request
    }

    pub fn top_n(&self) -> TopN {
        self.top_n
    }
}

/// Result of pressing "analyze".
#[derive(Debug)]
pub enum Trigger {
    Started(ScanTicket),
    /// A scan is already in flight; nothing happened.
    AlreadySubmitting,
    /// Validation failed; the error is available from `last_error`.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    Ranked { count: usize },
    Failed,
    /// Nothing happened: a scan was already in flight, or the ticket was abandoned by `reset`.
    Ignored,
}

pub struct ScanSession {
    service: Arc<dyn RankingService>,
    job_description: String,
    files: FileSet,
    priorities: PriorityConfiguration,
    top_n: TopN,
    phase: Phase,
    /// Bumped when a scan starts or is abandoned; a ticket from an older generation is stale.
    generation: u64,
    results: Option<ResultSet>,
    last_error: Option<ScanError>,
    expansion: RowExpansionState,
}

impl ScanSession {
    pub fn new(service: Arc<dyn RankingService>) -> Self {
        Self {
            service,
            job_description: String::new(),
            files: FileSet::new(),
            priorities: PriorityConfiguration::default(),
            top_n: TopN::default(),
            phase: Phase::Idle,
            generation: 0,
            results: None,
            last_error: None,
            expansion: RowExpansionState::default(),
        }
    }

    // ── inputs ──────────────────────────────────────────────────────────────

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn add_files(&mut self, files: impl IntoIterator<Item = SubmittedFile>) -> usize {
        self.files.add(files)
    }

    pub async fn add_paths<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<usize, ScanError> {
        self.files.add_paths(paths).await
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn set_priority(&mut self, criterion: Criterion, level: PriorityLevel) {
        self.priorities.set_level(criterion, level);
    }

    pub fn priorities(&self) -> &PriorityConfiguration {
        &self.priorities
    }

    pub fn set_top_n(&mut self, top_n: TopN) {
        self.top_n = top_n;
    }

    pub fn top_n(&self) -> TopN {
        self.top_n
    }

    // ── submission lifecycle ────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Validates the current inputs and moves to `Submitting`.
    pub fn begin_scan(&mut self) -> Trigger {
        if self.is_submitting() {
            debug!("Scan trigger ignored: a scan is already in flight");
            return Trigger::AlreadySubmitting;
        }

        self.last_error = None;

        match ScanRequest::build(&self.job_description, &self.files, &self.priorities) {
            Ok(request) => {
                self.phase = Phase::Submitting;
                self.generation += 1;
                Trigger::Started(ScanTicket {
                    request,
                    top_n: self.top_n,
                    generation: self.generation,
                })
            }
            Err(e) => {
                warn!("Scan rejected before submission: {e}");
                self.last_error = Some(e);
                Trigger::Rejected
            }
        }
    }

    /// Returns to `Idle`. Success replaces the result set; failure keeps the old one.
    /// A stale ticket (its scan abandoned by `reset`) changes nothing.
    pub fn finish_scan(
        &mut self,
        ticket: ScanTicket,
        outcome: Result<Vec<CandidateResult>, ScanError>,
    ) -> ScanOutcome {
        if ticket.generation != self.generation {
            debug!("Discarding outcome of an abandoned scan");
            return ScanOutcome::Ignored;
        }
        self.phase = Phase::Idle;

        match outcome {
            Ok(raw) => {
                let received = raw.len();
                let ranked = rank(raw, ticket.top_n);
                info!(
                    "Scan complete: {} candidate(s) received, keeping top {}",
                    received,
                    ranked.len()
                );
                let count = ranked.len();
                self.results = Some(ranked);
                self.expansion.reset();
                ScanOutcome::Ranked { count }
            }
            Err(e) => {
                warn!("Scan failed: {e}");
                self.last_error = Some(e);
                ScanOutcome::Failed
            }
        }
    }

    /// Runs one full scan against the ranking service.
    pub async fn submit(&mut self) -> ScanOutcome {
        let ticket = match self.begin_scan() {
            Trigger::Started(ticket) => ticket,
            Trigger::AlreadySubmitting => return ScanOutcome::Ignored,
            Trigger::Rejected => return ScanOutcome::Failed,
        };

        let service = Arc::clone(&self.service);
        let outcome = service.scan(ticket.request()).await;
        self.finish_scan(ticket, outcome)
    }

    // ── derived state ───────────────────────────────────────────────────────

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn metrics(&self) -> Option<AggregateMetrics> {
        compute_metrics(self.results.as_ref())
    }

    pub fn last_error(&self) -> Option<&ScanError> {
        self.last_error.as_ref()
    }

    /// The one line to show the user for the last failure, if any.
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ScanError::user_message)
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Drops the current results. Files, priorities and any pending error stay.
    ///
    /// A scan still marked in flight (its ticket dropped or its `submit` cancelled) is
    /// abandoned and the session returns to `Idle`.
    pub fn reset(&mut self) {
        if self.is_submitting() {
            warn!("Reset abandoned a scan that never finished");
            self.generation += 1;
            self.phase = Phase::Idle;
        }
        self.results = None;
        self.expansion.reset();
    }

    /// Flips the skill disclosure of the row at `index`. `None` if there is no such row.
    pub fn toggle_row(&mut self, index: usize) -> Option<bool> {
        let results = self.results.as_ref().filter(|r| index < r.len())?;
        let key = results.row_key(index);
        Some(self.expansion.toggle(key))
    }

    pub fn expansion(&self) -> &RowExpansionState {
        &self.expansion
    }

    pub fn export(&self) -> Option<String> {
        self.results.as_ref().and_then(to_delimited_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::config::Config;
    use crate::models::candidate::candidate;
    use crate::scan_client::mock::MockRankingService;
    use crate::scan_client::ScanClient;

    /// Answers each scan with the next canned outcome.
    struct ScriptedService {
        outcomes: Mutex<Vec<Result<Vec<CandidateResult>, ScanError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedService {
        fn new(outcomes: Vec<Result<Vec<CandidateResult>, ScanError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RankingService for ScriptedService {
        async fn scan(&self, _request: &ScanRequest) -> Result<Vec<CandidateResult>, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes.lock().unwrap().remove(0)
        }
    }

    fn ready_session(service: Arc<dyn RankingService>) -> ScanSession {
        let mut session = ScanSession::new(service);
        session.set_job_description("Senior Backend Engineer");
        session.add_files(vec![
            SubmittedFile::new("a.pdf", b"%PDF a".to_vec()),
            SubmittedFile::new("b.pdf", b"%PDF b".to_vec()),
        ]);
        session
    }

    fn scores(session: &ScanSession) -> Vec<f64> {
        session
            .results()
            .unwrap()
            .iter()
            .map(|c| c.final_score)
            .collect()
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_call() {
        let service = ScriptedService::new(vec![]);
        let mut session = ScanSession::new(service.clone());

        assert_eq!(session.submit().await, ScanOutcome::Failed);
        assert_eq!(service.calls(), 0);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(
            session.error_message().as_deref(),
            Some("Please provide a Job Description to begin analysis.")
        );
    }

    #[tokio::test]
    async fn test_missing_files_reported_after_job_description() {
        let service = ScriptedService::new(vec![]);
        let mut session = ScanSession::new(service.clone());
        session.set_job_description("Platform engineer");

        session.submit().await;
        assert_eq!(
            session.error_message().as_deref(),
            Some("Please upload at least one resume PDF.")
        );
        assert_eq!(service.calls(), 0);
    }

    #[test]
    fn test_trigger_while_submitting_is_ignored() {
        let service = ScriptedService::new(vec![]);
        let mut session = ready_session(service);

        let ticket = match session.begin_scan() {
            Trigger::Started(ticket) => ticket,
            other => panic!("expected scan to start, got {other:?}"),
        };
        assert!(session.is_submitting());
        assert!(matches!(session.begin_scan(), Trigger::AlreadySubmitting));

        let outcome = session.finish_scan(ticket, Ok(vec![candidate(10.0)]));
        assert_eq!(outcome, ScanOutcome::Ranked { count: 1 });
        assert_eq!(session.phase(), Phase::Idle);
        assert!(matches!(session.begin_scan(), Trigger::Started(_)));
    }

    #[test]
    fn test_top_n_is_captured_at_trigger_time() {
        let service = ScriptedService::new(vec![]);
        let mut session = ready_session(service);
        session.set_top_n(TopN::new(2).unwrap());

        let Trigger::Started(ticket) = session.begin_scan() else {
            panic!("expected scan to start");
        };
        session.set_top_n(TopN::new(20).unwrap());

        let raw = vec![candidate(1.0), candidate(2.0), candidate(3.0)];
        session.finish_scan(ticket, Ok(raw));
        assert_eq!(scores(&session), vec![3.0, 2.0]);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_results() {
        let service = ScriptedService::new(vec![
            Ok(vec![candidate(40.0), candidate(60.0)]),
            Err(ScanError::Network("connection reset".to_string())),
        ]);
        let mut session = ready_session(service.clone());

        assert_eq!(session.submit().await, ScanOutcome::Ranked { count: 2 });
        assert_eq!(session.submit().await, ScanOutcome::Failed);

        assert_eq!(service.calls(), 2);
        assert_eq!(scores(&session), vec![60.0, 40.0]);
        assert!(matches!(session.last_error(), Some(ScanError::Network(_))));
        assert_eq!(
            session.error_message().as_deref(),
            Some(crate::errors::ANALYSIS_FAILED_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_new_results_reset_expansion() {
        let service = ScriptedService::new(vec![
            Ok(vec![candidate(40.0)]),
            Ok(vec![candidate(80.0)]),
        ]);
        let mut session = ready_session(service);

        session.submit().await;
        assert_eq!(session.toggle_row(0), Some(true));
        let key = session.results().unwrap().row_key(0);
        assert!(session.expansion().is_expanded(&key));

        session.submit().await;
        assert!(!session.expansion().is_expanded(&key));
    }

    #[tokio::test]
    async fn test_toggle_row_without_results() {
        let service = ScriptedService::new(vec![Ok(vec![candidate(40.0)])]);
        let mut session = ready_session(service);

        assert_eq!(session.toggle_row(0), None);
        session.submit().await;
        assert_eq!(session.toggle_row(5), None);
    }

    #[tokio::test]
    async fn test_reset_clears_results_only() {
        let service = ScriptedService::new(vec![Ok(vec![candidate(40.0)])]);
        let mut session = ready_session(service);
        session.set_priority(Criterion::Skills, PriorityLevel::High);

        session.submit().await;
        assert!(session.export().is_some());

        session.reset();
        assert!(session.results().is_none());
        assert!(session.metrics().is_none());
        assert!(session.export().is_none());
        assert_eq!(session.files().len(), 2);
        assert_eq!(session.priorities().skills, PriorityLevel::High);
    }

    #[tokio::test]
    async fn test_reset_leaves_error_for_dismissal() {
        let service = ScriptedService::new(vec![Err(ScanError::Network("refused".to_string()))]);
        let mut session = ready_session(service);

        assert_eq!(session.submit().await, ScanOutcome::Failed);
        session.reset();
        assert!(matches!(session.last_error(), Some(ScanError::Network(_))));

        session.dismiss_error();
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_reset_recovers_from_dropped_ticket() {
        let service = ScriptedService::new(vec![]);
        let mut session = ready_session(service);

        let Trigger::Started(abandoned) = session.begin_scan() else {
            panic!("expected scan to start");
        };
        assert!(matches!(session.begin_scan(), Trigger::AlreadySubmitting));

        session.reset();
        assert_eq!(session.phase(), Phase::Idle);

        let Trigger::Started(current) = session.begin_scan() else {
            panic!("expected scan to start after reset");
        };
        // the abandoned scan finishing late must not clobber the live one
        assert_eq!(
            session.finish_scan(abandoned, Ok(vec![candidate(5.0)])),
            ScanOutcome::Ignored
        );
        assert!(session.is_submitting());
        assert!(session.results().is_none());

        assert_eq!(
            session.finish_scan(current, Ok(vec![candidate(70.0)])),
            ScanOutcome::Ranked { count: 1 }
        );
        assert_eq!(scores(&session), vec![70.0]);
    }

    #[tokio::test]
    async fn test_reset_recovers_from_cancelled_submit() {
        struct NeverAnswers;

        #[async_trait]
        impl RankingService for NeverAnswers {
            async fn scan(&self, _request: &ScanRequest) -> Result<Vec<CandidateResult>, ScanError> {
                std::future::pending().await
            }
        }

        let mut session = ready_session(Arc::new(NeverAnswers));
        let cancelled = tokio::time::timeout(std::time::Duration::from_millis(10), session.submit()).await;
        assert!(cancelled.is_err());
        assert!(session.is_submitting());
        assert_eq!(session.submit().await, ScanOutcome::Ignored);

        session.reset();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_end_to_end_against_ranking_service() {
        let row = |score: f64| {
            json!({
                "final_score": score,
                "skills_score": 70.0,
                "exp_score": 65.0,
                "edu_score": 50.0,
                "relevance_score": 80.0,
                "ats_score": 60.0,
                "matched_skills_count": 6,
                "matched_skills": ["rust", "tokio", "postgres", "kafka", "grpc", "aws"],
                "experience": "7 Years"
            })
        };
        let body = json!({ "results": [row(72.0), row(91.0)] });
        let mock = MockRankingService::start(200, body.to_string()).await;
        let client = ScanClient::new(&Config::with_base_url(&mock.base_url).unwrap()).unwrap();

        let mut session = ready_session(Arc::new(client));
        assert_eq!(session.submit().await, ScanOutcome::Ranked { count: 2 });

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        let file_names: Vec<_> = call.files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(file_names, vec!["a.pdf", "b.pdf"]);
        assert!(call.files.iter().all(|f| f.field == "files"));
        for c in Criterion::ALL {
            assert_eq!(call.text(c.field_name()), Some("Medium"));
        }

        assert_eq!(scores(&session), vec![91.0, 72.0]);
        let m = session.metrics().unwrap();
        assert_eq!(m.top_score, 91.0);
        assert_eq!(m.mean_score_display(), 81.5);
        assert_eq!(m.count, 2);

        let results = session.results().unwrap();
        let key = results.row_key(0);
        let first = &results.candidates()[0];
        assert_eq!(session.expansion().visible_skills(&key, first).len(), 4);
        assert_eq!(session.expansion().hidden_skill_count(&key, first), 2);
    }

    #[tokio::test]
    async fn test_service_error_surfaces_generic_message() {
        let mock = MockRankingService::start(
            400,
            json!({ "detail": "Job description is too short to analyze" }).to_string(),
        )
        .await;
        let client = ScanClient::new(&Config::with_base_url(&mock.base_url).unwrap()).unwrap();

        let mut session = ready_session(Arc::new(client));
        assert_eq!(session.submit().await, ScanOutcome::Failed);
        assert!(session.results().is_none());
        match session.last_error() {
            Some(ScanError::Service { status, payload }) => {
                assert_eq!(*status, 400);
                assert_eq!(payload["detail"], "Job description is too short to analyze");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }
}
