pub mod app;
pub mod clock;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod report;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;
pub mod validation;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
