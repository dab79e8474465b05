#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use tracing_subscriber::EnvFilter;

pub mod config;
pub mod cors;
pub mod routes;
pub mod vimeo;

pub use config::Config;
pub use routes::{videos::VideoListProxy, RouteError};

/// Installs the log subscriber for this function instance.
///
/// Vercel stamps every log line itself, so timestamps are left out.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vimeo_videos=info"));

    // Keeps whichever subscriber was installed first
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .try_init();
}
