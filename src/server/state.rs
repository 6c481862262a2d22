//! Shared, read-only state handed to every request handler.

use std::sync::Arc;

use crate::course::CourseGenerator;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<CourseGenerator>,
}

impl AppState {
    pub fn new(generator: CourseGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}
