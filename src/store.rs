use crate::codec::{self, ExportDocument};
use crate::errors::HabitError;
use crate::models::{Category, Habit, HabitId};
use crate::streak::{self, StreakPolicy};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{info, warn};

/// Owned habit collection. Every mutation leaves each habit's streak and
/// completion count consistent with its date set.
#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    habits: Vec<Habit>,
    policy: StreakPolicy,
    last_id: u64,
}

impl HabitStore {
    pub fn new(policy: StreakPolicy) -> Self {
        Self {
            habits: Vec::new(),
            policy,
            last_id: 0,
        }
    }

    /// Rebuilds a store from the persisted blob. A missing or unreadable blob
    /// yields an empty store; unreadable records are skipped individually.
    pub fn from_blob(blob: Option<&str>, policy: StreakPolicy, today: NaiveDate) -> Self {
        let mut store = Self::new(policy);
        let Some(blob) = blob else {
            return store;
        };

        let records = match serde_json::from_str::<Value>(blob) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                warn!("stored habits are not an array, starting empty");
                return store;
            }
            Err(err) => {
                warn!("failed to parse stored habits: {err}");
                return store;
            }
        };

        let habits = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<Habit>(record) {
                Ok(habit) => Some(habit),
                Err(err) => {
                    warn!(index, "skipping unreadable stored habit: {err}");
                    None
                }
            })
            .collect();

        store.replace_all(habits, today);
        store
    }

    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.habits)
    }

    pub fn policy(&self) -> StreakPolicy {
        self.policy
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn add(
        &mut self,
        name: &str,
        category: Category,
        now: DateTime<Utc>,
    ) -> Result<&Habit, HabitError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitError::EmptyName);
        }

        let id = self.next_id(now)?;
        self.habits
            .push(Habit::new(id, name.to_string(), category, now));
        info!(%id, name, "habit added");
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Flips completion for `today`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: HabitId, today: NaiveDate) -> Option<&Habit> {
        let policy = self.policy;
        let habit = self.habits.iter_mut().find(|habit| habit.id == id)?;

        if !habit.completed_dates.remove(&today) {
            habit.completed_dates.insert(today);
        }
        habit.streak = streak::calculate(&habit.completed_dates, policy, today);
        Some(&*habit)
    }

    pub fn delete(&mut self, id: HabitId) -> bool {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != id);
        before != self.habits.len()
    }

    pub fn clear_all(&mut self) {
        self.habits.clear();
    }

    /// Swaps in a whole new collection. Duplicate ids keep their first
    /// occurrence and every streak is recomputed.
    pub fn replace_all(&mut self, habits: Vec<Habit>, today: NaiveDate) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(habits.len());
        for mut habit in habits {
            if !seen.insert(habit.id) {
                warn!(id = %habit.id, "dropping habit with duplicate id");
                continue;
            }
            habit.streak = streak::calculate(&habit.completed_dates, self.policy, today);
            self.last_id = self.last_id.max(habit.id.0);
            kept.push(habit);
        }
        self.habits = kept;
    }

    /// Replaces the collection with the habits in `text`. On error the
    /// current collection is left untouched.
    pub fn import_snapshot(&mut self, text: &str, today: NaiveDate) -> Result<usize, HabitError> {
        let habits = codec::parse_snapshot(text)?;
        self.replace_all(habits, today);
        Ok(self.habits.len())
    }

    pub fn export_snapshot(&self, now: DateTime<Utc>) -> ExportDocument {
        codec::export_snapshot(&self.habits, now)
    }

    /// Recomputes every streak as of `today`. A current-run streak lapses
    /// with the calendar even when nothing is toggled.
    pub fn refresh_streaks(&mut self, today: NaiveDate) {
        for habit in &mut self.habits {
            habit.streak = streak::calculate(&habit.completed_dates, self.policy, today);
        }
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> Result<HabitId, HabitError> {
        if self.last_id == u64::MAX {
            return Err(HabitError::IdsExhausted);
        }
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;
        Ok(HabitId(id))
    }
}
