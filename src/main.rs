use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use policyscope::application::ports::JobRepository;
use policyscope::application::services::{
    PipelineController, PipelineWorker, ResearchReader, SubmissionService,
};
use policyscope::infrastructure::capabilities::{
    OllamaClient, OllamaComparison, OllamaExtraction, OllamaSummary, TavilySearch,
};
use policyscope::infrastructure::observability::{init_tracing, TracingConfig};
use policyscope::infrastructure::persistence::{InMemoryJobStore, PgJobStore};
use policyscope::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().map_err(anyhow::Error::msg)?;

    init_tracing(TracingConfig {
        environment: settings.environment.to_string(),
        json_format: settings.logging.json_format,
    });

    let repository: Arc<dyn JobRepository> = match &settings.storage.database_url {
        Some(url) => {
            let store = PgJobStore::connect(url).await?;
            store.migrate().await?;
            tracing::info!("Using Postgres job store");
            Arc::new(store)
        }
        None => {
            tracing::info!("No DATABASE_URL set, using in-memory job store");
            Arc::new(InMemoryJobStore::new())
        }
    };

    let ollama = Arc::new(OllamaClient::new(
        settings.llm.ollama_base_url.clone(),
        settings.llm.ollama_model.clone(),
    ));
    let search = Arc::new(TavilySearch::new(
        settings.search.tavily_api_key.clone(),
        settings.search.max_results,
    ));
    let extraction = Arc::new(OllamaExtraction::new(
        Arc::clone(&ollama),
        settings.llm.max_extraction_length,
    ));
    let comparison = Arc::new(OllamaComparison::new(Arc::clone(&ollama)));
    let summary = Arc::new(OllamaSummary::new(Arc::clone(&ollama)));

    let mut controller = PipelineController::new(
        Arc::clone(&repository),
        search,
        extraction,
        comparison,
        summary,
    );
    if let Some(secs) = settings.pipeline.stage_timeout_secs {
        controller = controller.with_stage_timeout(Duration::from_secs(secs));
    }
    let controller = Arc::new(controller);

    let (sender, receiver) = mpsc::channel(settings.pipeline.queue_capacity);
    let worker = PipelineWorker::new(receiver, Arc::clone(&controller));
    tokio::spawn(worker.run());

    let state = AppState {
        submission: Arc::new(SubmissionService::new(Arc::clone(&repository), sender)),
        reader: Arc::new(ResearchReader::new(Arc::clone(&repository))),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
