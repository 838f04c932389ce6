#![doc(test(attr(deny(warnings))))]

//! Expenza Core holds the expense aggregation, budget evaluation, and dataset
//! management engine behind the Expenza tracker UI.
//!
//! The [`store::ExpenseStore`] owns the dataset and serializes mutations;
//! [`analytics`] and [`budget_report`] expose the pure queries the dashboard
//! renders from; [`storage`] and [`export`] cover persistence and file
//! interchange.

pub mod analytics;
pub mod budget_report;
pub mod clock;
pub mod domain;
pub mod errors;
pub mod export;
pub mod id;
pub mod storage;
pub mod store;

pub use errors::{ExpenseError, Result};
pub use store::ExpenseStore;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("expenza_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Expenza Core tracing initialized.");
    });
}
