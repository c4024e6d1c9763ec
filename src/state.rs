use crate::config::Config;
use crate::errors::AppError;
use crate::storage::{load_store, persist_store};
use crate::store::HabitStore;
use chrono::NaiveDate;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::info;

/// Shared handle on the one habit collection and the file it is mirrored to.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<HabitStore>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, store: HabitStore) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Reads the persisted collection named by `config`, sanitized as of `today`.
    pub async fn load(config: &Config, today: NaiveDate) -> Self {
        let store = load_store(&config.data_path, config.streak_policy, today).await;
        info!(
            habits = store.habits().len(),
            policy = ?store.policy(),
            "loaded habits from {}",
            config.data_path.display()
        );
        Self::new(config.data_path.clone(), store)
    }

    /// Writes the whole collection back. Callers pass the guard they mutated
    /// through so the write happens before the lock is released.
    pub async fn persist(&self, store: &HabitStore) -> Result<(), AppError> {
        persist_store(&self.data_path, store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::streak::StreakPolicy;
    use chrono::{TimeZone, Utc};

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "habit_tracker_state_{tag}_{}_{nanos}.json",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn persisted_state_reloads_with_configured_policy() {
        let config = Config {
            data_path: temp_path("reload"),
            port: 0,
            streak_policy: StreakPolicy::Current,
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let state = AppState::load(&config, today).await;

        {
            let mut store = state.store.lock().await;
            assert_eq!(store.policy(), StreakPolicy::Current);
            let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let id = store.add("Walk", Category::Health, created).unwrap().id;
            store.toggle(id, today);
            state.persist(&store).await.unwrap();
        }

        let later = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let reloaded = AppState::load(&config, later).await;
        let store = reloaded.store.lock().await;
        assert_eq!(store.habits().len(), 1);
        assert_eq!(store.habits()[0].streak(), 0);
        let _ = tokio::fs::remove_file(&config.data_path).await;
    }
}
