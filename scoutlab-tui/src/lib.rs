//! ScoutLab dashboard: terminal interface over the gold tables.
//!
//! Provides interactive exploration of the warehouse with:
//! - Team standings by season and competition
//! - G-League target search with filters and CSV export
//! - Player profiles with radar scores and side-by-side comparison
//! - Background pipeline re-runs on a worker thread

pub mod app;
pub mod config;
pub mod data_loader;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use config::DashboardConfig;
pub use data_loader::GoldTables;
pub use theme::Theme;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}

    #[test]
    fn worker_messages_cross_threads() {
        assert_send::<worker::WorkerCommand>();
        assert_send::<worker::WorkerResponse>();
        assert_send::<GoldTables>();
    }
}
