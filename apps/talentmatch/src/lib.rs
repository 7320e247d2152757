//! TalentMatch client: submits a job description and a batch of resumes to the
//! remote ranking service, then ranks, summarises and exports what comes back.
//!
//! Front ends drive a [`session::ScanSession`]; everything else is reachable from it.

pub mod config;
pub mod errors;
pub mod intake;
pub mod models;
pub mod results;
pub mod scan_client;
pub mod session;
