use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::Instrument;

use crate::domain::JobId;

use super::pipeline::PipelineController;

pub struct PipelineMessage {
    pub job_id: JobId,
}

/// Long-lived consumer of submitted jobs. Each message spawns an independent
/// pipeline run, so any number of jobs may be in flight while stages within
/// one job stay strictly sequential.
pub struct PipelineWorker {
    receiver: mpsc::Receiver<PipelineMessage>,
    controller: Arc<PipelineController>,
}

impl PipelineWorker {
    pub fn new(
        receiver: mpsc::Receiver<PipelineMessage>,
        controller: Arc<PipelineController>,
    ) -> Self {
        Self {
            receiver,
            controller,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Pipeline worker started");
        while let Some(msg) = self.receiver.recv().await {
            let controller = Arc::clone(&self.controller);
            let span = tracing::info_span!("research_job", job_id = %msg.job_id);
            tokio::spawn(
                async move {
                    match controller.run(msg.job_id).await {
                        Ok(status) => {
                            tracing::info!(status = %status, "Pipeline run finished");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Pipeline run aborted");
                        }
                    }
                }
                .instrument(span),
            );
        }
        tracing::info!("Pipeline worker stopped: channel closed");
    }
}
