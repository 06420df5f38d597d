use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;

use crate::nutrition::NutritionClient;
use stride_core::db::Database;
use stride_core::models::{DailyGoals, FoodRecord, LogCategory, NewWorkout, validate_amount};
use stride_core::search::resolve;
use stride_core::store::MemoryStore;
use stride_core::summary::{goal_percentage, is_over_goal};

const BODY_LIMIT: usize = 1024 * 1024; // 1 MB

#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Database>>,
    store: Arc<Mutex<MemoryStore>>,
    nutrition: Arc<NutritionClient>,
    user_id: i64,
}

impl AppState {
    fn db(&self) -> std::sync::MutexGuard<'_, Database> {
        self.db
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn store(&self) -> std::sync::MutexGuard<'_, MemoryStore> {
        self.store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

// --- Request / Response types ---

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResults {
    results: Vec<FoodRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_mock: Option<bool>,
}

#[derive(Deserialize)]
struct AddFriendRequest {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct FriendIdRequest {
    id: i64,
}

#[derive(Deserialize)]
struct NudgeRequest {
    id: i64,
    message: Option<String>,
}

#[derive(Deserialize)]
struct LogAmountRequest {
    amount: Option<f64>,
}

#[derive(Deserialize)]
struct SetGoalRequest {
    calories: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateWorkoutRequest {
    name: String,
    #[serde(rename = "type")]
    workout_type: String,
    equipment: Option<String>,
    muscles: Option<String>,
    instructions: String,
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct WorkoutListQuery {
    #[serde(rename = "type")]
    workout_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateScheduleRequest {
    week_start_date: String,
    plan_data: serde_json::Value,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Error handling ---

enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(err) => {
                eprintln!("Internal server error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

// --- Middleware ---

async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}

// --- Handlers ---

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn search_calories(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResults>, ApiError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        return Err(ApiError::BadRequest(
            "Query parameter \"q\" is required".to_string(),
        ));
    }

    let stamp_ms = Utc::now().timestamp_millis();
    let remote = state.nutrition.search_async(query, stamp_ms).await;
    let outcome = resolve(remote, query, stamp_ms);
    let is_mock = outcome.is_fallback().then_some(true);

    Ok(Json(SearchResults {
        results: outcome.into_records(),
        is_mock,
    }))
}

// --- Friend handlers (session roster, reset on restart) ---

async fn list_friends(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store();
    Json(serde_json::json!({ "friends": store.friends }))
}

async fn add_friend(
    State(state): State<AppState>,
    Json(req): Json<AddFriendRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let now_ms = Utc::now().timestamp_millis();
    let mut store = state.store();
    let friend = store
        .add_friend(req.name, req.email, now_ms)
        .map_err(|e| ApiError::BadRequest(format!("{e}")))?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "friend": friend })),
    ))
}

async fn accept_friend(
    State(state): State<AppState>,
    Json(req): Json<FriendIdRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store();
    let friend = store
        .accept_friend(req.id)
        .ok_or_else(|| ApiError::NotFound("Friend not found".to_string()))?;
    Ok(Json(serde_json::json!({ "friend": friend })))
}

async fn nudge_friend(
    State(state): State<AppState>,
    Json(req): Json<NudgeRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let at = Utc::now().to_rfc3339();
    let mut store = state.store();
    let event = store
        .nudge_friend(req.id, req.message, at)
        .ok_or_else(|| ApiError::NotFound("Friend not found".to_string()))?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "nudge": event })),
    ))
}

// --- Activity log handlers ---

async fn get_goals() -> Json<DailyGoals> {
    Json(DailyGoals::default())
}

fn parse_category(raw: &str) -> Result<LogCategory, ApiError> {
    LogCategory::parse(raw)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown log category '{raw}'")))
}

async fn get_daily_logs(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = parse_category(&category)?;
    let today = Local::now().format("%Y-%m-%d").to_string();
    let summary = {
        let db = state.db();
        db.daily_logs(category, state.user_id, &today)
            .context("database error")?
    };
    let value = serde_json::to_value(summary).context("failed to serialize logs")?;
    Ok(Json(value))
}

async fn create_log(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(req): Json<LogAmountRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let category = parse_category(&category)?;
    let amount = req.amount.unwrap_or(0.0);
    validate_amount(amount).map_err(|_| ApiError::BadRequest("Invalid amount".to_string()))?;

    let row = {
        let db = state.db();
        db.insert_log(category, state.user_id, amount)
            .context("database error")?
    };
    let value = serde_json::to_value(row).context("failed to serialize log entry")?;
    Ok((StatusCode::CREATED, Json(value)))
}

// --- Day log handlers (today's foods + session goal) ---

fn day_response(store: &MemoryStore) -> serde_json::Value {
    let totals = store.day.totals();
    let goal = store.day.goal();
    serde_json::json!({
        "date": store.day.last_date.map(|d| d.format("%Y-%m-%d").to_string()),
        "foods": store.day.entries,
        "totals": totals,
        "goal": goal,
        "progressPercentage": goal_percentage(totals.calories, goal),
        "isOverGoal": is_over_goal(totals.calories, goal),
    })
}

async fn get_day(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut store = state.store();
    store.day.roll_over(Local::now().date_naive());
    Json(day_response(&store))
}

async fn add_day_food(
    State(state): State<AppState>,
    Json(food): Json<FoodRecord>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let now_ms = Utc::now().timestamp_millis();
    let entry = {
        let mut store = state.store();
        store.day.roll_over(Local::now().date_naive());
        store.day.add(food, now_ms)
    };

    let value = serde_json::to_value(entry).context("failed to serialize entry")?;
    Ok((StatusCode::CREATED, Json(value)))
}

async fn remove_day_food(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store();
    if store.day.remove(&unique_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "No logged food with id '{unique_id}'"
        )))
    }
}

async fn clear_day_foods(State(state): State<AppState>) -> StatusCode {
    let mut store = state.store();
    store.day.clear();
    StatusCode::NO_CONTENT
}

async fn set_day_goal(
    State(state): State<AppState>,
    Json(req): Json<SetGoalRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut store = state.store();
    store
        .day
        .set_goal(req.calories)
        .map_err(|e| ApiError::BadRequest(format!("{e}")))?;
    Ok(Json(serde_json::json!({ "goal": store.day.goal() })))
}

// --- Workout handlers ---

async fn list_workouts(
    State(state): State<AppState>,
    Query(params): Query<WorkoutListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let workouts = {
        let db = state.db();
        match params.workout_type.as_deref() {
            Some(t) => db
                .list_workouts(Some(t))
                .map_err(|e| ApiError::BadRequest(format!("{e}")))?,
            None => db.list_workouts(None).context("database error")?,
        }
    };
    let value = serde_json::to_value(workouts).context("failed to serialize workouts")?;
    Ok(Json(value))
}

async fn create_workout(
    State(state): State<AppState>,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let new_workout = NewWorkout {
        name,
        workout_type: req.workout_type,
        equipment: req.equipment,
        muscles: req.muscles,
        instructions: req.instructions,
        image_url: req.image_url,
    };

    let id = {
        let db = state.db();
        db.insert_workout(&new_workout)
            .map_err(|e| ApiError::BadRequest(format!("{e}")))?
    };
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "id": id })),
    ))
}

// --- Schedule handlers ---

async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    chrono::NaiveDate::parse_from_str(&req.week_start_date, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid date '{}'. Use YYYY-MM-DD",
            req.week_start_date
        ))
    })?;

    let schedule = {
        let db = state.db();
        db.create_schedule(state.user_id, &req.week_start_date, &req.plan_data)
            .map_err(|e| ApiError::BadRequest(format!("{e}")))?
    };
    let value = serde_json::to_value(schedule).context("failed to serialize schedule")?;
    Ok((StatusCode::CREATED, Json(value)))
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let schedule = {
        let db = state.db();
        db.get_schedule(state.user_id, &week)
            .context("database error")?
    };
    let schedule = schedule
        .ok_or_else(|| ApiError::NotFound(format!("No schedule for week {week}")))?;
    let value = serde_json::to_value(schedule).context("failed to serialize schedule")?;
    Ok(Json(value))
}

// --- Router builder ---

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calories/search", get(search_calories))
        .route("/friends/list", get(list_friends))
        .route("/friends/add", post(add_friend))
        .route("/friends/accept", post(accept_friend))
        .route("/friends/nudge", post(nudge_friend))
        .route("/api/goals", get(get_goals))
        .route("/api/logs/{category}", get(get_daily_logs).post(create_log))
        .route("/api/day", get(get_day))
        .route(
            "/api/day/foods",
            post(add_day_food).delete(clear_day_foods),
        )
        .route("/api/day/foods/{unique_id}", delete(remove_day_food))
        .route("/api/day/goal", put(set_day_goal))
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/schedules", post(create_schedule))
        .route("/api/schedules/{week}", get(get_schedule))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

// --- Server startup ---

pub async fn start_server(
    db: Database,
    nutrition: NutritionClient,
    port: u16,
    bind: &str,
) -> anyhow::Result<()> {
    let user_id = db.ensure_default_user()?;
    let state = AppState {
        db: Arc::new(Mutex::new(db)),
        store: Arc::new(Mutex::new(MemoryStore::with_demo_friends())),
        nutrition: Arc::new(nutrition),
        user_id,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{bind}:{port}")).await?;
    eprintln!("Listening on http://{bind}:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let db = Database::open_in_memory().unwrap();
        let user_id = db.ensure_default_user().unwrap();
        AppState {
            db: Arc::new(Mutex::new(db)),
            store: Arc::new(Mutex::new(MemoryStore::with_demo_friends())),
            nutrition: Arc::new(NutritionClient::new(None)),
            user_id,
        }
    }

    fn test_app() -> Router {
        build_router(test_state())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn get_req(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(
        method: &str,
        uri: &str,
        body: &serde_json::Value,
    ) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = test_app().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn search_missing_query_returns_400() {
        let response = test_app()
            .oneshot(get_req("/calories/search"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Query parameter \"q\" is required"
        );
    }

    #[tokio::test]
    async fn search_blank_query_returns_400() {
        let response = test_app()
            .oneshot(get_req("/calories/search?q=%20%20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_without_api_key_serves_fallback() {
        let response = test_app()
            .oneshot(get_req("/calories/search?q=apple"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["isMock"], true);
        assert_eq!(json["results"][0]["name"], "apple");
        assert_eq!(json["results"][0]["calories"], 95);
        assert_eq!(json["results"][0]["servingSize"], "182g");
    }

    #[tokio::test]
    async fn search_unknown_food_still_returns_a_result() {
        let response = test_app()
            .oneshot(get_req("/calories/search?q=unknownfood123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["results"][0]["name"], "unknownfood123");
        assert_eq!(json["results"][0]["calories"], 100);
    }

    #[tokio::test]
    async fn friends_list_is_seeded() {
        let response = test_app().oneshot(get_req("/friends/list")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let friends = json["friends"].as_array().unwrap();
        assert_eq!(friends.len(), 3);
        assert_eq!(friends[0]["name"], "Alex");
        assert_eq!(friends[0]["streakDays"], 6);
        assert_eq!(friends[2]["status"], "Ghosting");
    }

    #[tokio::test]
    async fn add_friend_without_fields_returns_400() {
        let response = test_app()
            .oneshot(json_req("POST", "/friends/add", &serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn add_friend_prepends_pending_entry() {
        let state = test_state();
        let app = build_router(state.clone());

        let response = app
            .oneshot(json_req(
                "POST",
                "/friends/add",
                &serde_json::json!({"name": "Taylor"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["friend"]["name"], "Taylor");
        assert_eq!(json["friend"]["status"], "Pending");
        assert_eq!(json["friend"]["lastActive"], "Not yet");

        let store = state.store();
        assert_eq!(store.friends[0].name, "Taylor");
        assert_eq!(store.friends.len(), 4);
    }

    #[tokio::test]
    async fn accept_friend_unknown_returns_404() {
        let response = test_app()
            .oneshot(json_req(
                "POST",
                "/friends/accept",
                &serde_json::json!({"id": 999}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Friend not found");
    }

    #[tokio::test]
    async fn accept_friend_flips_status() {
        let response = test_app()
            .oneshot(json_req(
                "POST",
                "/friends/accept",
                &serde_json::json!({"id": 3}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["friend"]["status"], "On track");
    }

    #[tokio::test]
    async fn nudge_friend_defaults_message() {
        let response = test_app()
            .oneshot(json_req(
                "POST",
                "/friends/nudge",
                &serde_json::json!({"id": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["nudge"]["id"], 1);
        assert_eq!(json["nudge"]["friendId"], 2);
        assert_eq!(json["nudge"]["message"], "Nudge!");
    }

    #[tokio::test]
    async fn goals_endpoint_returns_reference_targets() {
        let response = test_app().oneshot(get_req("/api/goals")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["water"], 2000);
        assert_eq!(json["steps"], 10000);
        assert_eq!(json["calories"], 2000);
    }

    #[tokio::test]
    async fn unknown_log_category_returns_404() {
        let response = test_app()
            .oneshot(get_req("/api/logs/sleep"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_log_rejects_invalid_amount() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({"amount": 0}),
            serde_json::json!({"amount": -250}),
        ] {
            let response = test_app()
                .oneshot(json_req("POST", "/api/logs/water", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"], "Invalid amount");
        }
    }

    #[tokio::test]
    async fn logs_accumulate_per_category() {
        let state = test_state();

        for amount in [250, 500] {
            let response = build_router(state.clone())
                .oneshot(json_req(
                    "POST",
                    "/api/logs/water",
                    &serde_json::json!({"amount": amount}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = build_router(state.clone())
            .oneshot(get_req("/api/logs/water"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["total"], 750.0);
        assert_eq!(json["logs"].as_array().unwrap().len(), 2);

        // Other categories are unaffected
        let response = build_router(state)
            .oneshot(get_req("/api/logs/steps"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["total"], 0.0);
    }

    #[tokio::test]
    async fn day_starts_empty_with_default_goal() {
        let response = test_app().oneshot(get_req("/api/day")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["foods"].as_array().unwrap().is_empty());
        assert_eq!(json["goal"], 2000);
        assert_eq!(json["totals"]["calories"], 0.0);
        assert_eq!(json["progressPercentage"], 0.0);
        assert_eq!(json["isOverGoal"], false);
        let today = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(json["date"], today);
    }

    #[tokio::test]
    async fn add_food_updates_totals_and_progress() {
        let state = test_state();

        let apple = serde_json::json!({
            "id": "1700000000000-0",
            "name": "apple",
            "servingSize": "182g",
            "calories": 95,
            "macros": {"protein": 0.5, "carbs": 25.0, "fat": 0.3, "fiber": 4.4, "sugar": 19.0}
        });
        let response = build_router(state.clone())
            .oneshot(json_req("POST", "/api/day/foods", &apple))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let entry = body_json(response).await;
        assert_eq!(entry["name"], "apple");
        assert!(entry["uniqueId"].as_str().unwrap().starts_with("1700000000000-0-"));

        let response = build_router(state)
            .oneshot(get_req("/api/day"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["foods"].as_array().unwrap().len(), 1);
        assert_eq!(json["totals"]["calories"], 95.0);
        assert_eq!(json["isOverGoal"], false);
    }

    #[tokio::test]
    async fn removing_day_food_keeps_calorie_views_consistent() {
        let state = test_state();

        let apple = serde_json::json!({
            "id": "1700000000000-0",
            "name": "apple",
            "servingSize": "182g",
            "calories": 95,
            "macros": {"protein": 0.5, "carbs": 25.0, "fat": 0.3, "fiber": 4.4, "sugar": 19.0}
        });
        let response = build_router(state.clone())
            .oneshot(json_req("POST", "/api/day/foods", &apple))
            .await
            .unwrap();
        let entry = body_json(response).await;
        let unique_id = entry["uniqueId"].as_str().unwrap().to_string();

        let response = build_router(state.clone())
            .oneshot(
                axum::http::Request::delete(format!("/api/day/foods/{unique_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = build_router(state.clone())
            .oneshot(get_req("/api/day"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["totals"]["calories"], 0.0);

        // The persisted calorie log must agree with the day view
        let response = build_router(state)
            .oneshot(get_req("/api/logs/calories"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["total"], 0.0);
    }

    #[tokio::test]
    async fn remove_unknown_food_returns_404() {
        let response = test_app()
            .oneshot(
                axum::http::Request::delete("/api/day/foods/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn clear_day_foods_empties_log() {
        let state = test_state();

        let apple = serde_json::json!({
            "id": "1700000000000-0",
            "name": "apple",
            "servingSize": "182g",
            "calories": 95,
            "macros": {"protein": 0.5, "carbs": 25.0, "fat": 0.3, "fiber": 4.4, "sugar": 19.0}
        });
        build_router(state.clone())
            .oneshot(json_req("POST", "/api/day/foods", &apple))
            .await
            .unwrap();

        let response = build_router(state.clone())
            .oneshot(
                axum::http::Request::delete("/api/day/foods")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = build_router(state)
            .oneshot(get_req("/api/day"))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["foods"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn goal_rejects_out_of_range_and_keeps_old_value() {
        let state = test_state();

        let response = build_router(state.clone())
            .oneshot(json_req(
                "PUT",
                "/api/day/goal",
                &serde_json::json!({"calories": 900}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = build_router(state.clone())
            .oneshot(get_req("/api/day"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["goal"], 2000);

        let response = build_router(state)
            .oneshot(json_req(
                "PUT",
                "/api/day/goal",
                &serde_json::json!({"calories": 2500}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["goal"], 2500);
    }

    #[tokio::test]
    async fn create_workout_validates_type() {
        let response = test_app()
            .oneshot(json_req(
                "POST",
                "/api/workouts",
                &serde_json::json!({
                    "name": "Trail run",
                    "type": "outdoor",
                    "instructions": "Run on a trail."
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_and_list_workouts() {
        let state = test_state();

        let response = build_router(state.clone())
            .oneshot(json_req(
                "POST",
                "/api/workouts",
                &serde_json::json!({
                    "name": "Deadlift",
                    "type": "gym",
                    "equipment": "Barbell",
                    "muscles": "Back, Glutes, Hamstrings",
                    "instructions": "Hinge at the hips and keep the bar close."
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = build_router(state.clone())
            .oneshot(get_req("/api/workouts?type=gym"))
            .await
            .unwrap();
        let json = body_json(response).await;
        let workouts = json.as_array().unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0]["name"], "Deadlift");
        assert_eq!(workouts[0]["type"], "gym");

        let response = build_router(state)
            .oneshot(get_req("/api/workouts?type=cardio"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn schedule_create_get_and_duplicate() {
        let state = test_state();
        let plan = serde_json::json!({
            "weekStartDate": "2024-03-11",
            "planData": {"monday": ["Push-ups"], "wednesday": ["Squats"]}
        });

        let response = build_router(state.clone())
            .oneshot(json_req("POST", "/api/schedules", &plan))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = build_router(state.clone())
            .oneshot(json_req("POST", "/api/schedules", &plan))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = build_router(state.clone())
            .oneshot(get_req("/api/schedules/2024-03-11"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["planData"]["monday"][0], "Push-ups");

        let response = build_router(state)
            .oneshot(get_req("/api/schedules/2024-03-18"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn schedule_rejects_bad_date() {
        let response = test_app()
            .oneshot(json_req(
                "POST",
                "/api/schedules",
                &serde_json::json!({"weekStartDate": "next week", "planData": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn security_headers_present() {
        let response = test_app().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
        assert_eq!(
            response.headers().get("content-security-policy").unwrap(),
            "default-src 'none'"
        );
    }

    #[tokio::test]
    async fn body_size_limit_rejects_oversized() {
        let big_body = vec![b'x'; BODY_LIMIT + 1];
        let response = test_app()
            .oneshot(
                axum::http::Request::post("/friends/add")
                    .header("content-type", "application/json")
                    .body(Body::from(big_body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stride.db");

        let user_id = {
            let db = Database::open(&path).unwrap();
            let user_id = db.ensure_default_user().unwrap();
            db.insert_log(LogCategory::Water, user_id, 500.0).unwrap();
            user_id
        };

        let db = Database::open(&path).unwrap();
        assert_eq!(db.ensure_default_user().unwrap(), user_id);
        let today = Local::now().format("%Y-%m-%d").to_string();
        let water = db.daily_logs(LogCategory::Water, user_id, &today).unwrap();
        assert_eq!(water.logs.len(), 1);
    }

    #[tokio::test]
    async fn internal_error_does_not_leak_details() {
        let error = ApiError::Internal(anyhow::anyhow!("secret path /home/user/.stride/db"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
        assert!(!json["error"].as_str().unwrap().contains("secret"));
    }
}
