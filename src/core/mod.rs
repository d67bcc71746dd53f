pub(crate) mod bootstrap;
pub(crate) mod config;
pub(crate) mod rate_limit;
pub(crate) mod security;
pub(crate) mod shutdown;
pub(crate) mod state;
pub(crate) mod telemetry;
pub(crate) mod time;
