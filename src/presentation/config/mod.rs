mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LlmSettings, LoggingSettings, PipelineSettings, SearchSettings, ServerSettings, Settings,
    StorageSettings,
};
