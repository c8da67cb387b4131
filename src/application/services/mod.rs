mod pipeline;
mod reader;
mod stages;
mod submission;
mod worker;

pub use pipeline::{PipelineController, PipelineError, PipelineState, StageOutcome};
pub use reader::{ExportError, ExportFormat, ReadError, ResearchReader, ResultOutcome, StatusView};
pub use stages::{
    CompareStage, ExtractStage, NoopProgressSink, ProgressSink, SearchStage, StageFailure,
    SummarizeStage,
};
pub use submission::{SubmissionService, SubmitError};
pub use worker::{PipelineMessage, PipelineWorker};
