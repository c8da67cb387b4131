mod helpers;

use std::sync::Arc;

use policyscope::application::ports::JobFilter;
use policyscope::application::services::{
    ExportError, ExportFormat, ReadError, ResearchReader, ResultOutcome, SubmissionService,
    SubmitError,
};
use policyscope::domain::{JobId, JobStatus, ResearchJob, Stage};

use helpers::{happy_pipeline, sample_request, BrokenJobStore};

#[tokio::test]
async fn given_completed_job_when_fetching_status_then_full_progress_and_no_error() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let job = ResearchJob::new(sample_request());
    pipeline.repository.create(&job).await.unwrap();
    pipeline.controller.run(job.id).await.unwrap();

    let view = reader.status(job.id).await.unwrap();
    assert_eq!(view.status, JobStatus::Completed);
    assert!(view.error_message.is_none());
    for stage in Stage::ALL {
        assert_eq!(view.progress.get(stage), 1.0);
    }
}

#[tokio::test]
async fn given_pending_job_when_fetching_result_then_not_ready() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let job = ResearchJob::new(sample_request());
    pipeline.repository.create(&job).await.unwrap();

    match reader.result(job.id).await.unwrap() {
        ResultOutcome::NotReady { status, .. } => assert_eq!(status, JobStatus::Pending),
        other => panic!("Expected NotReady, got {:?}", other),
    }
}

#[tokio::test]
async fn given_failed_job_when_fetching_result_then_failure_with_message() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let mut job = ResearchJob::new(sample_request());
    job.start().unwrap();
    job.fail("search stage failed: quota exhausted").unwrap();
    pipeline.repository.create(&job).await.unwrap();

    match reader.result(job.id).await.unwrap() {
        ResultOutcome::Failed { error_message } => {
            assert!(error_message.contains("quota exhausted"));
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn given_completed_job_when_fetching_result_then_full_record() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let job = ResearchJob::new(sample_request());
    pipeline.repository.create(&job).await.unwrap();
    pipeline.controller.run(job.id).await.unwrap();

    match reader.result(job.id).await.unwrap() {
        ResultOutcome::Ready(record) => {
            assert_eq!(record.id, job.id);
            assert!(record.outputs.is_complete());
        }
        other => panic!("Expected Ready, got {:?}", other),
    }
}

#[tokio::test]
async fn given_unknown_id_when_reading_then_not_found_is_distinct() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    assert!(matches!(
        reader.status(JobId::new()).await,
        Err(ReadError::NotFound(_))
    ));
    assert!(matches!(
        reader.result(JobId::new()).await,
        Err(ReadError::NotFound(_))
    ));
    assert!(matches!(
        reader.delete(JobId::new()).await,
        Err(ReadError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_completed_job_when_exporting_structured_then_round_trips_to_same_outputs() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let job = ResearchJob::new(sample_request());
    pipeline.repository.create(&job).await.unwrap();
    pipeline.controller.run(job.id).await.unwrap();

    let exported = reader
        .export(job.id, ExportFormat::Structured)
        .await
        .unwrap();
    let parsed: ResearchJob = serde_json::from_str(&exported).unwrap();

    let stored = match reader.result(job.id).await.unwrap() {
        ResultOutcome::Ready(record) => record,
        other => panic!("Expected Ready, got {:?}", other),
    };

    assert_eq!(parsed.id, stored.id);
    assert_eq!(parsed.status, JobStatus::Completed);
    assert_eq!(
        parsed.outputs.search.as_ref().unwrap().len(),
        stored.outputs.search.as_ref().unwrap().len()
    );
    assert_eq!(
        parsed.outputs.extract.as_ref().unwrap().len(),
        stored.outputs.extract.as_ref().unwrap().len()
    );
    assert_eq!(
        parsed.outputs.compare.as_ref().unwrap()[0].topic,
        stored.outputs.compare.as_ref().unwrap()[0].topic
    );
    assert_eq!(
        parsed.outputs.summarize.as_ref().unwrap().executive_summary,
        stored.outputs.summarize.as_ref().unwrap().executive_summary
    );
}

#[tokio::test]
async fn given_completed_job_when_exporting_text_then_markdown_report_has_sections() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let job = ResearchJob::new(sample_request());
    pipeline.repository.create(&job).await.unwrap();
    pipeline.controller.run(job.id).await.unwrap();

    let report = reader.export(job.id, ExportFormat::Text).await.unwrap();
    assert!(report.contains("# Policy Research Report"));
    assert!(report.contains("## Executive Summary"));
    assert!(report.contains("## Key Findings"));
    assert!(report.contains("## Comparative Analysis"));
    assert!(report.contains("EU AI Act"));
}

#[tokio::test]
async fn given_non_completed_job_when_exporting_then_refused() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let job = ResearchJob::new(sample_request());
    pipeline.repository.create(&job).await.unwrap();

    let result = reader.export(job.id, ExportFormat::Structured).await;
    assert!(matches!(result, Err(ExportError::NotCompleted(_))));
}

#[tokio::test]
async fn given_format_strings_when_parsing_then_accepts_aliases() {
    assert_eq!(
        "structured".parse::<ExportFormat>().unwrap(),
        ExportFormat::Structured
    );
    assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Structured);
    assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
    assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
    assert!("xml".parse::<ExportFormat>().is_err());
}

#[tokio::test]
async fn given_broken_store_when_submitting_then_storage_error_is_surfaced() {
    let (sender, _receiver) = tokio::sync::mpsc::channel(1);
    let submission = SubmissionService::new(Arc::new(BrokenJobStore), sender);

    let result = submission.submit(sample_request()).await;
    assert!(matches!(result, Err(SubmitError::Storage(_))));
}

#[tokio::test]
async fn given_broken_store_when_reading_then_storage_error_not_conflated_with_not_found() {
    let reader = ResearchReader::new(Arc::new(BrokenJobStore));
    let id = JobId::new();

    assert!(matches!(reader.status(id).await, Err(ReadError::Storage(_))));
    assert!(matches!(reader.result(id).await, Err(ReadError::Storage(_))));
    assert!(matches!(
        reader.list(JobFilter::default()).await,
        Err(ReadError::Storage(_))
    ));
    assert!(matches!(
        reader.export(id, ExportFormat::Structured).await,
        Err(ExportError::Read(ReadError::Storage(_)))
    ));
}

#[tokio::test]
async fn given_deleted_job_when_listing_then_absent() {
    let pipeline = happy_pipeline();
    let reader = ResearchReader::new(Arc::clone(&pipeline.repository));

    let job = ResearchJob::new(sample_request());
    pipeline.repository.create(&job).await.unwrap();

    reader.delete(job.id).await.unwrap();
    let summaries = reader.list(JobFilter::default()).await.unwrap();
    assert!(summaries.iter().all(|s| s.id != job.id));
}
