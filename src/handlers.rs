use crate::codec::{self, ExportDocument};
use crate::errors::AppError;
use crate::models::{
    AddHabitRequest, CalendarMonth, CalendarQuery, Category, CategoryShare, HabitId, HabitView,
    ImportResponse, MonthlySeries, StatsSummary, WeeklySeries,
};
use crate::state::AppState;
use crate::stats;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Datelike, Local, NaiveDate, Utc};
use tracing::{info, warn};

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<HabitView>> {
    let (today, now) = (today(), Utc::now());
    let mut store = state.store.lock().await;
    store.refresh_streaks(today);
    let views = store
        .habits()
        .iter()
        .map(|habit| stats::habit_view(habit, today, now))
        .collect();
    Json(views)
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<AddHabitRequest>,
) -> Result<(StatusCode, Json<HabitView>), AppError> {
    let category = payload
        .category
        .as_deref()
        .map(Category::from_key)
        .unwrap_or(Category::Personal);

    let now = Utc::now();
    let mut store = state.store.lock().await;
    let view = {
        let habit = store.add(&payload.name, category, now)?;
        stats::habit_view(habit, today(), now)
    };

    state.persist(&store).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let (today, now) = (today(), Utc::now());
    let mut store = state.store.lock().await;
    let Some(view) = store
        .toggle(HabitId(id), today)
        .map(|habit| stats::habit_view(habit, today, now))
    else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    state.persist(&store).await?;
    Ok(Json(view).into_response())
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    if store.delete(HabitId(id)) {
        state.persist(&store).await?;
        info!(id, "habit deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_habits(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let mut store = state.store.lock().await;
    store.clear_all();
    state.persist(&store).await?;
    info!("all habits cleared");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSummary> {
    let today = today();
    let mut store = state.store.lock().await;
    store.refresh_streaks(today);
    Json(stats::build_summary_at(today, store.habits()))
}

pub async fn get_weekly(State(state): State<AppState>) -> Json<WeeklySeries> {
    let store = state.store.lock().await;
    Json(stats::weekly_distribution(store.habits()))
}

pub async fn get_monthly(State(state): State<AppState>) -> Json<MonthlySeries> {
    let store = state.store.lock().await;
    Json(stats::monthly_distribution_at(today(), store.habits()))
}

pub async fn get_categories(State(state): State<AppState>) -> Json<Vec<CategoryShare>> {
    let store = state.store.lock().await;
    Json(stats::category_shares(stats::category_distribution(
        store.habits(),
    )))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, AppError> {
    let today = today();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    let store = state.store.lock().await;
    Ok(Json(stats::calendar_month(store.habits(), year, month, today)?))
}

pub async fn export_snapshot(
    State(state): State<AppState>,
) -> ([(header::HeaderName, String); 1], Json<ExportDocument>) {
    let store = state.store.lock().await;
    let document = store.export_snapshot(Utc::now());
    let disposition = format!(
        "attachment; filename=\"{}\"",
        codec::export_filename(today())
    );
    ([(header::CONTENT_DISPOSITION, disposition)], Json(document))
}

pub async fn import_snapshot(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let mut store = state.store.lock().await;
    let imported = store.import_snapshot(&body, today()).map_err(|err| {
        warn!("import rejected: {err}");
        err
    })?;

    state.persist(&store).await?;
    info!(imported, "habits imported");
    Ok(Json(ImportResponse { imported }))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
