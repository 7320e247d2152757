// User input collected before a scan: the resume file set and the validated request built from it.

pub mod file_set;
pub mod request;

pub use file_set::{FileSet, SubmittedFile};
pub use request::ScanRequest;
