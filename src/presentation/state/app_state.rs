use std::sync::Arc;

use crate::application::services::{ResearchReader, SubmissionService};

#[derive(Clone)]
pub struct AppState {
    pub submission: Arc<SubmissionService>,
    pub reader: Arc<ResearchReader>,
}
