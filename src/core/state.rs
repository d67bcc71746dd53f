use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::{config::Settings, rate_limit::RateLimiter};

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: SqlitePool,
    limiter: RateLimiter,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: SqlitePool) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, limiter: RateLimiter::new() }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub(crate) fn limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }
}
