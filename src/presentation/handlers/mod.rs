mod export;
mod health;
mod jobs;
mod result;
mod status;
mod submit;

pub use export::export_handler;
pub use health::health_handler;
pub use jobs::{delete_handler, list_handler};
pub use result::result_handler;
pub use status::status_handler;
pub use submit::submit_handler;
