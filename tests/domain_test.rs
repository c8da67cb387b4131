mod helpers;

use policyscope::domain::{
    JobId, JobStateError, JobStatus, ResearchJob, Stage, StageProgress,
};

use helpers::{sample_documents, sample_request};

#[test]
fn given_two_job_ids_when_generated_then_are_unique() {
    assert_ne!(JobId::new(), JobId::new());
}

#[test]
fn given_new_job_when_created_then_pending_with_zero_progress() {
    let job = ResearchJob::new(sample_request());
    assert_eq!(job.status, JobStatus::Pending);
    assert!(job.error_message.is_none());
    for stage in Stage::ALL {
        assert_eq!(job.progress.get(stage), 0.0);
        assert!(!job.outputs.is_written(stage));
    }
}

#[test]
fn given_pending_job_when_starting_then_running_and_restart_is_refused() {
    let mut job = ResearchJob::new(sample_request());
    job.start().unwrap();
    assert_eq!(job.status, JobStatus::Running);

    assert_eq!(
        job.start(),
        Err(JobStateError::NotPending(JobStatus::Running))
    );
}

#[test]
fn given_running_job_when_recording_output_then_progress_reaches_one() {
    let mut job = ResearchJob::new(sample_request());
    job.start().unwrap();

    job.record_search_output(sample_documents()).unwrap();
    assert_eq!(job.progress.get(Stage::Search), 1.0);
    assert!(job.outputs.is_written(Stage::Search));
}

#[test]
fn given_written_output_when_writing_again_then_refused() {
    let mut job = ResearchJob::new(sample_request());
    job.start().unwrap();
    job.record_search_output(sample_documents()).unwrap();

    assert_eq!(
        job.record_search_output(Vec::new()),
        Err(JobStateError::OutputAlreadyWritten(Stage::Search))
    );
}

#[test]
fn given_pending_job_when_recording_output_then_refused() {
    let mut job = ResearchJob::new(sample_request());
    assert_eq!(
        job.record_search_output(Vec::new()),
        Err(JobStateError::NotRunning(JobStatus::Pending))
    );
}

#[test]
fn given_incomplete_outputs_when_completing_then_refused() {
    let mut job = ResearchJob::new(sample_request());
    job.start().unwrap();
    job.record_search_output(sample_documents()).unwrap();

    assert_eq!(job.complete(), Err(JobStateError::IncompleteOutputs));
}

#[test]
fn given_all_outputs_when_completing_then_completed_and_progress_full() {
    let mut job = ResearchJob::new(sample_request());
    job.start().unwrap();
    job.record_search_output(sample_documents()).unwrap();
    job.record_extract_output(Vec::new()).unwrap();
    job.record_compare_output(Vec::new()).unwrap();
    job.record_summary_output(policyscope::domain::Summary::new("done"))
        .unwrap();

    job.complete().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.progress.is_all_complete());
}

#[test]
fn given_running_job_when_failing_then_failed_with_message_and_kept_outputs() {
    let mut job = ResearchJob::new(sample_request());
    job.start().unwrap();
    job.record_search_output(sample_documents()).unwrap();

    job.fail("extract stage failed: model unreachable").unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error_message.as_deref().unwrap().contains("extract"));
    assert!(job.outputs.search.is_some());

    // terminal states reject further transitions
    assert_eq!(
        job.fail("again"),
        Err(JobStateError::Terminal(JobStatus::Failed))
    );
    assert_eq!(job.complete(), Err(JobStateError::NotRunning(JobStatus::Failed)));
}

#[test]
fn given_progress_when_advancing_then_monotonic_and_clamped() {
    let mut progress = StageProgress::new();
    progress.advance(Stage::Extract, 0.5);
    progress.advance(Stage::Extract, 0.25);
    assert_eq!(progress.get(Stage::Extract), 0.5);

    progress.advance(Stage::Extract, 7.0);
    assert_eq!(progress.get(Stage::Extract), 1.0);

    progress.advance(Stage::Extract, -3.0);
    assert_eq!(progress.get(Stage::Extract), 1.0);
}

#[test]
fn given_stages_when_walking_next_then_fixed_linear_chain() {
    assert_eq!(Stage::first(), Stage::Search);
    assert_eq!(Stage::Search.next(), Some(Stage::Extract));
    assert_eq!(Stage::Extract.next(), Some(Stage::Compare));
    assert_eq!(Stage::Compare.next(), Some(Stage::Summarize));
    assert_eq!(Stage::Summarize.next(), None);
}

#[test]
fn given_status_strings_when_parsing_then_round_trips() {
    for status in [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
    ] {
        assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
    }
    assert!("bogus".parse::<JobStatus>().is_err());
    assert!(JobStatus::Completed.is_terminal());
    assert!(!JobStatus::Running.is_terminal());
}
