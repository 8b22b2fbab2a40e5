//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{InvalidCoordinate, InvalidLandmarkId, Landmark, LandmarkId, LatLng};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/landmarks", get(list_landmarks))
        .route("/landmarks/categories", get(landmark_categories))
        .route("/landmarks/:id", get(landmark_detail))
        .route("/landmarks/:id/route", post(select_route))
        .route("/route", get(current_route))
        .route("/route/reload", post(reload_route))
        .route("/location", put(update_location))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List landmarks, optionally filtered by name or category.
async fn list_landmarks(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Json<LandmarkListResponse> {
    let now = state.now();
    let landmarks = state
        .catalog
        .search(&req.q)
        .into_iter()
        .map(|l| LandmarkSummary::from_landmark(l, now))
        .collect();

    Json(LandmarkListResponse { landmarks })
}

/// Landmarks grouped by category.
async fn landmark_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let now = state.now();
    let categories = state
        .catalog
        .by_category()
        .into_iter()
        .map(|group| CategoryGroup {
            category: group.name.to_string(),
            landmarks: group
                .landmarks
                .into_iter()
                .map(|l| LandmarkSummary::from_landmark(l, now))
                .collect(),
        })
        .collect();

    Json(CategoriesResponse { categories })
}

/// Full details of one landmark.
async fn landmark_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LandmarkDetail>, AppError> {
    let landmark = find_landmark(&state, &id)?;
    let rating = state.catalog.rating_summary(landmark);

    Ok(Json(LandmarkDetail::new(landmark, rating, state.now())))
}

/// Select a landmark and start fetching the route to it.
///
/// Responds immediately; poll `GET /route` for the result.
async fn select_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteResponse>, AppError> {
    let landmark = find_landmark(&state, &id)?;

    // Dropping the task detaches it; the coordinator discards the result if superseded
    let task = state.routes.spawn_request(landmark);

    Ok(Json(RouteResponse::from(task.issued())))
}

/// Fetch the route to the selected landmark again.
///
/// Does nothing if no landmark has been selected.
async fn reload_route(State(state): State<AppState>) -> Json<RouteResponse> {
    match state.routes.spawn_reload() {
        Some(task) => Json(RouteResponse::from(task.issued())),
        None => Json(RouteResponse::from(&state.routes.state())),
    }
}

/// Current route state.
async fn current_route(State(state): State<AppState>) -> Json<RouteResponse> {
    Json(RouteResponse::from(&state.routes.state()))
}

/// Update the device location used as the route origin.
async fn update_location(
    State(state): State<AppState>,
    Json(req): Json<LocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let origin = LatLng::new(req.lat, req.lng)?;
    state.routes.update_origin(origin);

    Ok(Json(LocationResponse { origin }))
}

fn find_landmark<'a>(state: &'a AppState, id: &str) -> Result<&'a Landmark, AppError> {
    let id = LandmarkId::new(id)?;
    state.catalog.get(&id).ok_or_else(|| AppError::NotFound {
        message: format!("Unknown landmark: {id}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl From<InvalidLandmarkId> for AppError {
    fn from(e: InvalidLandmarkId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Weekday;
    use serde_json::json;

    use super::*;
    use crate::catalog::{CatalogSnapshot, LandmarkCatalog};
    use crate::directions::StraightLineRoutes;
    use crate::domain::{TimeOfDay, WeekInstant};
    use crate::route::{RouteCoordinator, RouteState};

    fn state() -> AppState {
        let snapshot: CatalogSnapshot = serde_json::from_value(json!({
            "landmarks": [
                {
                    "id": "fort-santiago",
                    "name": "Fort Santiago",
                    "location": {"lat": 14.5950, "lng": 120.9694},
                    "category": "Historical",
                    "entranceFee": 75,
                    "openingHours": {
                        "monday": {"open": "08:00", "close": "22:00"},
                        "wednesday": {"open": "08:00", "close": "22:00"}
                    }
                },
                {
                    "id": "san-agustin",
                    "name": "San Agustin Church",
                    "location": {"lat": 14.5889, "lng": 120.9753},
                    "category": "Church"
                }
            ],
            "feedback": [
                {"location": "Fort Santiago", "rating": 5},
                {"location": "Fort Santiago", "rating": 4}
            ]
        }))
        .unwrap();

        let catalog = LandmarkCatalog::from_snapshot(snapshot).unwrap();
        let origin = LatLng::new(14.5896, 120.9747).unwrap();
        let routes = RouteCoordinator::new(Arc::new(StraightLineRoutes::new()), origin);

        AppState::new(catalog, routes).with_clock(|| {
            WeekInstant::new(Weekday::Wed, TimeOfDay::from_hm(10, 0).unwrap())
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn list_filters_by_query() {
        let state = state();

        let Json(all) = list_landmarks(State(state.clone()), Query(SearchRequest::default())).await;
        assert_eq!(all.landmarks.len(), 2);

        let Json(found) = list_landmarks(
            State(state),
            Query(SearchRequest {
                q: "church".into(),
            }),
        )
        .await;
        assert_eq!(found.landmarks.len(), 1);
        assert_eq!(found.landmarks[0].id, "san-agustin");
        assert_eq!(found.landmarks[0].status, "Opening hours unavailable");
    }

    #[tokio::test]
    async fn categories_are_sorted() {
        let Json(resp) = landmark_categories(State(state())).await;
        let names: Vec<_> = resp.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, ["Church", "Historical"]);
    }

    #[tokio::test]
    async fn detail_for_known_landmark() {
        let Json(detail) = landmark_detail(State(state()), Path("fort-santiago".into()))
            .await
            .unwrap();

        assert!(detail.summary.is_open);
        assert_eq!(detail.summary.status, "Open now until 22:00");
        assert_eq!(detail.summary.entrance, "P75");
        assert_eq!(detail.rating_text, "4.5 / 5 (2 reviews)");
        assert_eq!(detail.schedule.len(), 4);
        assert_eq!(detail.schedule[0].days, "Monday");
        assert_eq!(detail.schedule[1].days, "Tuesday");
        assert_eq!(detail.schedule[1].hours, "Closed");
        assert!(detail.schedule[1].closed);
        assert!(!detail.schedule[0].closed);
    }

    #[tokio::test]
    async fn detail_for_unknown_landmark() {
        let err = landmark_detail(State(state()), Path("binondo".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = landmark_detail(State(state()), Path("  ".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn select_then_poll_route() {
        let state = state();

        let Json(resp) = select_route(State(state.clone()), Path("fort-santiago".into()))
            .await
            .unwrap();
        assert_eq!(resp.state, "loading");
        assert_eq!(resp.landmark_id.as_deref(), Some("fort-santiago"));

        let mut sub = state.routes.subscribe();
        let ready = sub.changed().await.unwrap();
        assert!(matches!(ready, RouteState::Ready { .. }));

        let Json(resp) = current_route(State(state)).await;
        assert_eq!(resp.state, "ready");
        assert!(resp.distance_text.is_some());
    }

    #[tokio::test]
    async fn select_reports_own_landmark_when_reselected() {
        let state = state();

        let Json(first) = select_route(State(state.clone()), Path("fort-santiago".into()))
            .await
            .unwrap();
        let Json(second) = select_route(State(state.clone()), Path("san-agustin".into()))
            .await
            .unwrap();

        assert_eq!(first.state, "loading");
        assert_eq!(first.landmark_id.as_deref(), Some("fort-santiago"));
        assert_eq!(second.state, "loading");
        assert_eq!(second.landmark_id.as_deref(), Some("san-agustin"));

        let Json(reload) = reload_route(State(state)).await;
        assert_eq!(reload.state, "loading");
        assert_eq!(reload.landmark_id.as_deref(), Some("san-agustin"));
    }

    #[tokio::test]
    async fn reload_without_selection() {
        let Json(resp) = reload_route(State(state())).await;
        assert_eq!(resp.state, "idle");
    }

    #[tokio::test]
    async fn location_update() {
        let state = state();

        let Json(resp) = update_location(
            State(state.clone()),
            Json(LocationRequest {
                lat: 14.6,
                lng: 121.0,
            }),
        )
        .await
        .unwrap();
        assert_eq!(resp.origin, LatLng::new(14.6, 121.0).unwrap());
        assert_eq!(state.routes.origin(), resp.origin);

        let err = update_location(
            State(state),
            Json(LocationRequest {
                lat: 91.0,
                lng: 0.0,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[test]
    fn error_status_codes() {
        let resp = AppError::NotFound {
            message: "gone".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::BadRequest {
            message: "bad".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn router_builds() {
        let _ = create_router(state());
    }
}
