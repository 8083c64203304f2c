use crate::dates::{date_key, first_of_month, parse_day, parse_month, start_of_day, DateRange};
use crate::errors::AppError;
use crate::models::{
    CalendarQuery, DailySummary, GoalCalendar, HealthResponse, RangeQuery, ReportQuery,
    StatsQuery, StatsResponse, StreakResponse, User, Walk, WeeklyReport,
};
use crate::report::{build_daily_summary, build_goal_calendar, build_weekly_report};
use crate::state::AppState;
use crate::stats::{build_stats, resolve_window};
use crate::streak::compute_streak;
use crate::validation::{parse_new_user, parse_new_walk, parse_user_patch, parse_walk_patch};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

type JsonBody = Result<Json<Value>, JsonRejection>;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.read().await.list_users())
}

pub async fn create_user(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(body) = body?;
    let new = parse_new_user(&body)?;
    let now = state.now();
    let user = state.mutate(|data| Ok(data.create_user(new, now))).await?;
    info!(user_id = %user.id, "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id, "user")?;
    let data = state.read().await;
    Ok(Json(data.find_user(id)?.clone()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id, "user")?;
    let Json(body) = body?;
    let patch = parse_user_patch(&body)?;
    let now = state.now();
    let user = state
        .mutate(|data| Ok(data.update_user(id, patch, now)?))
        .await?;
    info!(user_id = %user.id, "updated user");
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "user")?;
    state.mutate(|data| Ok(data.delete_user(id)?)).await?;
    info!(user_id = %id, "deleted user");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_streak(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StreakResponse>, AppError> {
    let id = parse_id(&id, "user")?;
    let data = state.read().await;
    data.find_user(id)?;
    let walks = data.find_walks_by_user(id, None);
    Ok(Json(StreakResponse {
        streak: compute_streak(&walks, state.now()),
    }))
}

pub async fn get_weekly_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<WeeklyReport>, AppError> {
    let id = parse_id(&id, "user")?;
    let Query(query) = query?;
    let anchor = match query.date.as_deref() {
        Some(raw) => {
            start_of_day(parse_day(raw).ok_or_else(|| AppError::invalid_date("date", raw))?)
        }
        None => state.now(),
    };

    let data = state.read().await;
    let goal = data.find_user(id)?.goal();
    let walks = data.find_walks_by_user(id, None);
    build_weekly_report(&walks, goal, anchor)
        .map(Json)
        .ok_or_else(|| AppError::invalid_date("date", &date_key(anchor.date_naive())))
}

pub async fn get_today(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DailySummary>, AppError> {
    let id = parse_id(&id, "user")?;
    let data = state.read().await;
    let goal = data.find_user(id)?.goal();
    let walks = data.find_walks_by_user(id, None);
    Ok(Json(build_daily_summary(&walks, goal, state.now())))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> Result<Json<GoalCalendar>, AppError> {
    let id = parse_id(&id, "user")?;
    let Query(query) = query?;
    let month = match query.month.as_deref() {
        Some(raw) => parse_month(raw).ok_or_else(|| AppError::invalid_date("month", raw))?,
        None => first_of_month(state.now().date_naive()),
    };

    let data = state.read().await;
    let goal = data.find_user(id)?.goal();
    let walks = data.find_walks_by_user(id, None);
    build_goal_calendar(&walks, goal, month)
        .map(Json)
        .ok_or_else(|| AppError::invalid_date("month", &month.format("%Y-%m").to_string()))
}

pub async fn create_walk(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Walk>), AppError> {
    let Json(body) = body?;
    let now = state.now();
    let new = parse_new_walk(&body, now)?;
    let walk = state.mutate(|data| Ok(data.create_walk(new, now)?)).await?;
    info!(walk_id = %walk.id, user_id = %walk.user_id, steps = walk.steps, "created walk");
    Ok((StatusCode::CREATED, Json(walk)))
}

pub async fn get_walk(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Walk>, AppError> {
    let id = parse_id(&id, "walk")?;
    let data = state.read().await;
    Ok(Json(data.find_walk(id)?.clone()))
}

pub async fn update_walk(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Walk>, AppError> {
    let id = parse_id(&id, "walk")?;
    let Json(body) = body?;
    let now = state.now();
    let walk = state
        .mutate(|data| {
            let owner = data.find_walk(id)?.user_id;
            let patch = parse_walk_patch(&body, owner)?;
            Ok(data.update_walk(id, patch, now)?)
        })
        .await?;
    info!(walk_id = %walk.id, "updated walk");
    Ok(Json(walk))
}

pub async fn delete_walk(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "walk")?;
    state.mutate(|data| Ok(data.delete_walk(id)?)).await?;
    info!(walk_id = %id, "deleted walk");
    Ok(StatusCode::NO_CONTENT)
}

/// Half-open `[startDate, endDate)`; either bound may be left out.
pub async fn list_user_walks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<Walk>>, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let Query(query) = query?;
    let range = match (&query.start_date, &query.end_date) {
        (None, None) => None,
        (start, end) => {
            let start = bound(start.as_deref(), "startDate")?
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            let end = bound(end.as_deref(), "endDate")?
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            Some(DateRange::half_open(start, end))
        }
    };

    let data = state.read().await;
    data.find_user(user_id)?;
    Ok(Json(data.find_walks_by_user(user_id, range.as_ref())))
}

pub async fn get_walk_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<StatsResponse>, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let Query(query) = query?;
    let window = resolve_window(&query, state.now())?;

    let data = state.read().await;
    data.find_user(user_id)?;
    let walks = data.find_walks_by_user(user_id, Some(&window.range));
    Ok(Json(build_stats(&walks, &window)))
}

/// Malformed ids are reported as missing records.
fn parse_id(raw: &str, kind: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found(format!("{kind} {raw} not found")))
}

fn bound(raw: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    raw.map(|value| {
        parse_day(value)
            .map(start_of_day)
            .ok_or_else(|| AppError::invalid_date(field, value))
    })
    .transpose()
}
