//! pulse-api: data-fetch layer for the dashboard — REST client, offline
//! fixtures, and KPI report export.

pub mod client;
pub mod mock;
pub mod report;
pub mod source;

pub use client::ApiClient;
pub use mock::MockData;
pub use report::{ExportFormat, render_csv};
pub use source::DataSource;
