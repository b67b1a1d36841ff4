use std::sync::Arc;

use crate::{repos::Repos, services::PathRevalidator};

#[derive(Clone)]
pub struct AppState {
    /// Database repositories.
    pub repos: Repos,
    /// Cache invalidation for rendered front-end paths.
    pub revalidator: Arc<dyn PathRevalidator>,
}
