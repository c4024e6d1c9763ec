use crate::errors::AppError;
use crate::store::HabitStore;
use crate::streak::StreakPolicy;
use chrono::NaiveDate;
use std::path::Path;
use tokio::fs;
use tracing::error;

/// Reads the raw habits blob. A missing file is simply "nothing stored yet".
pub async fn read_blob(path: &Path) -> Option<String> {
    match fs::read_to_string(path).await {
        Ok(blob) => Some(blob),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read data file: {err}");
            None
        }
    }
}

pub async fn load_store(path: &Path, policy: StreakPolicy, today: NaiveDate) -> HabitStore {
    let blob = read_blob(path).await;
    HabitStore::from_blob(blob.as_deref(), policy, today)
}

/// Overwrites the data file with the full collection.
pub async fn persist_store(path: &Path, store: &HabitStore) -> Result<(), AppError> {
    let payload = store.to_blob().map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "habit_tracker_{tag}_{}_{nanos}.json",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let today = Utc::now().date_naive();
        let store = load_store(&temp_path("missing"), StreakPolicy::Longest, today).await;
        assert!(store.habits().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, b"{not json").await.unwrap();
        let today = Utc::now().date_naive();
        let store = load_store(&path, StreakPolicy::Longest, today).await;
        assert!(store.habits().is_empty());
        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persist_then_load() {
        let path = temp_path("roundtrip");
        let today = Utc::now().date_naive();
        let mut store = HabitStore::default();
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 7, 30, 0).unwrap();
        let id = store.add("Floss", Category::Health, created).unwrap().id;
        store.toggle(id, today);

        persist_store(&path, &store).await.unwrap();
        let loaded = load_store(&path, StreakPolicy::Longest, today).await;
        assert_eq!(loaded.habits(), store.habits());
        let _ = fs::remove_file(&path).await;
    }
}
