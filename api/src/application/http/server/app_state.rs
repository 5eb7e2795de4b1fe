use std::sync::Arc;

use gutlog_core::application::GutlogService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: GutlogService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: GutlogService) -> Self {
        Self { args, service }
    }
}
