pub mod app;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod points;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod todos;
pub mod ui;
pub mod state;

pub use app::router;
pub use models::AppData;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
