pub mod app;
pub mod codec;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;
pub mod state;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, HabitError};
pub use models::{Category, Habit, HabitId};
pub use state::AppState;
pub use storage::{load_store, persist_store};
pub use store::HabitStore;
pub use streak::StreakPolicy;
