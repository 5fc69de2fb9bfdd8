//! Forwards newsletter sign-ups to the MailerLite subscriber API.

pub mod app;
pub mod config;
mod error;
pub mod mailerlite;
pub mod web;

pub use app::{App, AppState};
pub use error::{Error, Result};
pub use mailerlite::{MailerLiteClient, SubscriberRegistry};
pub use web::serve;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Human readable tracing for local development. `RUST_LOG` overrides the `debug` default.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(env_filter("debug"))
        .compact()
        .init();
}

pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter("info"))
        .compact()
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
