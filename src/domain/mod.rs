mod clause;
mod comparison;
mod document;
mod job_id;
mod job_status;
mod research_job;
mod research_request;
mod stage;
mod summary;

pub use clause::{ClauseType, ExtractedClause};
pub use comparison::Comparison;
pub use document::Document;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use research_job::{JobStateError, JobSummary, ResearchJob, StageOutputs, StageProgress};
pub use research_request::ResearchRequest;
pub use stage::Stage;
pub use summary::Summary;
