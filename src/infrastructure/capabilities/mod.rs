mod ollama_client;
mod ollama_comparison;
mod ollama_extraction;
mod ollama_summary;
mod tavily_search;

pub use ollama_client::OllamaClient;
pub use ollama_comparison::OllamaComparison;
pub use ollama_extraction::OllamaExtraction;
pub use ollama_summary::OllamaSummary;
pub use tavily_search::TavilySearch;
