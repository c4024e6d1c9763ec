use crate::dates;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub u64);

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Habit category. Keys outside the known set are kept verbatim so older
/// data keeps displaying what the user originally picked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Health,
    Sport,
    Study,
    Work,
    Personal,
    Other(String),
}

impl Category {
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "health" | "salud" => Category::Health,
            "sport" | "deporte" => Category::Sport,
            "study" | "estudio" => Category::Study,
            "work" | "trabajo" => Category::Work,
            "personal" => Category::Personal,
            _ => Category::Other(key.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Category::Health => "health",
            Category::Sport => "sport",
            Category::Study => "study",
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Health => "Health",
            Category::Sport => "Sport",
            Category::Study => "Study",
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Category::from_key(&key))
    }
}

/// A tracked habit. `streak` and the completion count are derived from
/// `completed_dates` and only change through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HabitRecord", into = "HabitRecord")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub(crate) completed_dates: BTreeSet<NaiveDate>,
    pub(crate) streak: u32,
}

impl Habit {
    pub fn new(id: HabitId, name: String, category: Category, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            category,
            created_at,
            completed_dates: BTreeSet::new(),
            streak: 0,
        }
    }

    pub fn completed_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.completed_dates
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn total_completions(&self) -> usize {
        self.completed_dates.len()
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }
}

/// On-disk and export shape of a habit. Reading is lenient: dates may be in
/// any supported form and derived fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub id: HabitId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub completed_dates: Vec<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub total_completions: usize,
}

impl From<Habit> for HabitRecord {
    fn from(habit: Habit) -> Self {
        Self {
            total_completions: habit.total_completions(),
            id: habit.id,
            name: habit.name,
            category: habit.category,
            completed_dates: habit
                .completed_dates
                .into_iter()
                .map(|date| Value::String(dates::to_canonical(date)))
                .collect(),
            created_at: Some(habit.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            streak: habit.streak,
        }
    }
}

impl TryFrom<HabitRecord> for Habit {
    type Error = String;

    fn try_from(record: HabitRecord) -> Result<Self, Self::Error> {
        if record.name.trim().is_empty() {
            return Err(format!("habit {} has an empty name", record.id));
        }

        let created_at = record
            .created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(|| {
                warn!(id = %record.id, "habit has no usable createdAt, using current time");
                Utc::now()
            });

        Ok(Self {
            id: record.id,
            name: record.name,
            category: record.category,
            created_at,
            completed_dates: dates::sanitize(&record.completed_dates),
            streak: 0,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddHabitRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    pub id: HabitId,
    pub name: String,
    pub category: Category,
    pub category_label: String,
    pub completed_dates: Vec<String>,
    pub created_at: String,
    pub streak: u32,
    pub total_completions: usize,
    pub completed_today: bool,
    pub completion_rate: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub today_count: usize,
    pub total_count: usize,
    pub longest_streak: u32,
    pub productivity_score: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySeries {
    pub labels: [&'static str; 7],
    pub counts: [u32; 7],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySeries {
    pub year: i32,
    pub month: u32,
    pub counts: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: Category,
    pub label: String,
    pub count: usize,
}

pub type CategoryDistribution = BTreeMap<Category, usize>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub display: String,
    pub day: u32,
    pub completed_habits: usize,
    pub is_today: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn category_known_and_legacy_keys() {
        assert_eq!(Category::from_key("health"), Category::Health);
        assert_eq!(Category::from_key("Deporte"), Category::Sport);
        assert_eq!(Category::from_key("trabajo"), Category::Work);
        assert_eq!(
            Category::from_key("hobby"),
            Category::Other("hobby".to_string())
        );
    }

    #[test]
    fn unknown_category_passes_through_for_display() {
        let category = Category::from_key("gardening");
        assert_eq!(category.label(), "gardening");
        assert_eq!(serde_json::to_string(&category).unwrap(), "\"gardening\"");
    }

    #[test]
    fn habit_serializes_derived_fields() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let mut habit = Habit::new(HabitId(7), "Read".into(), Category::Study, created);
        habit
            .completed_dates
            .insert(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        habit.streak = 1;

        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["category"], json!("study"));
        assert_eq!(value["completedDates"], json!(["2024-01-02"]));
        assert_eq!(value["createdAt"], json!("2024-01-01T08:00:00.000Z"));
        assert_eq!(value["totalCompletions"], json!(1));
        assert_eq!(value["streak"], json!(1));
    }

    #[test]
    fn habit_record_reading_sanitizes_dates() {
        let value = json!({
            "id": 1700000000000u64,
            "name": "Run",
            "category": "deporte",
            "completedDates": ["02/01/2024", "2024-01-02", "bogus", null],
            "createdAt": "2024-01-01T00:00:00.000Z",
            "streak": 99,
            "totalCompletions": 12
        });
        let habit: Habit = serde_json::from_value(value).unwrap();
        assert_eq!(habit.category, Category::Sport);
        assert_eq!(habit.total_completions(), 1);
        assert_eq!(habit.streak(), 0);
    }

    #[test]
    fn habit_record_with_blank_name_is_rejected() {
        let value = json!({"id": 3, "name": "  ", "category": "work"});
        let err = serde_json::from_value::<Habit>(value).unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }
}
