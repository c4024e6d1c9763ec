use crate::errors::HabitError;
use crate::models::Habit;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub habits: Vec<Habit>,
    pub exported_at: String,
    pub version: String,
}

pub fn export_snapshot(habits: &[Habit], now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        habits: habits.to_vec(),
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        version: FORMAT_VERSION.to_string(),
    }
}

pub fn export_filename(today: NaiveDate) -> String {
    format!("habit-tracker-backup-{}.json", today.format("%Y-%m-%d"))
}

/// Parses an exported document. Only `habits` is structurally required; the
/// returned habits have sanitized dates but no streaks computed yet.
pub fn parse_snapshot(text: &str) -> Result<Vec<Habit>, HabitError> {
    let document: Value = serde_json::from_str(text)?;
    habits_from_document(document)
}

pub fn habits_from_document(document: Value) -> Result<Vec<Habit>, HabitError> {
    let Value::Object(mut fields) = document else {
        return Err(HabitError::InvalidFormat(
            "document must be a JSON object".to_string(),
        ));
    };

    if let Some(version) = fields.get("version").and_then(Value::as_str) {
        if version != FORMAT_VERSION {
            debug!(version, "importing document with unexpected version");
        }
    }

    let Some(Value::Array(records)) = fields.remove("habits") else {
        return Err(HabitError::InvalidFormat(
            "`habits` must be an array".to_string(),
        ));
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<Habit>(record)
                .map_err(|source| HabitError::InvalidRecord { index, source })
        })
        .collect()
}
