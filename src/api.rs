// src/api.rs
//! JSON surface over the current catalog snapshot.

use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::catalog::Snapshot;
use crate::ingest::scheduler::refresh_once;
use crate::ingest::types::{Category, QuizRecord, SheetProvider};

#[derive(Clone)]
pub struct AppState {
    pub snapshot: Snapshot,
    pub providers: Arc<Vec<Box<dyn SheetProvider>>>,
}

impl AppState {
    pub fn new(snapshot: Snapshot, providers: Vec<Box<dyn SheetProvider>>) -> Self {
        Self {
            snapshot,
            providers: Arc::new(providers),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/quizzes", get(list_quizzes))
        .route("/quizzes/{id}", get(quiz_detail))
        .route("/home", get(home))
        .route("/categories", get(list_categories))
        .route("/categories/{label}", get(category_quizzes))
        .route("/admin/refresh", post(admin_refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct QuizList {
    fetched_at_unix: u64,
    count: usize,
    records: Vec<QuizRecord>,
}

impl QuizList {
    fn new(fetched_at_unix: u64, records: Vec<QuizRecord>) -> Self {
        Self {
            fetched_at_unix,
            count: records.len(),
            records,
        }
    }
}

async fn list_quizzes(State(state): State<AppState>) -> Json<QuizList> {
    let cat = state.snapshot.current();
    Json(QuizList::new(cat.fetched_at_unix(), cat.records().to_vec()))
}

#[derive(serde::Serialize)]
struct QuizDetail {
    record: QuizRecord,
    related: Vec<QuizRecord>,
}

async fn quiz_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuizDetail>, StatusCode> {
    let cat = state.snapshot.current();
    let record = cat.find_by_id(&id).ok_or(StatusCode::NOT_FOUND)?;
    let related = cat.related(record).into_iter().cloned().collect();
    Ok(Json(QuizDetail {
        record: record.clone(),
        related,
    }))
}

#[derive(serde::Serialize)]
struct HomeOut {
    featured: Vec<QuizRecord>,
    others: Vec<QuizRecord>,
}

async fn home(State(state): State<AppState>) -> Json<HomeOut> {
    let cat = state.snapshot.current();
    let (featured, others) = cat.featured_split();
    Json(HomeOut {
        featured: featured.to_vec(),
        others: others.to_vec(),
    })
}

#[derive(serde::Serialize)]
struct CategoryOut {
    label: &'static str,
    count: usize,
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryOut>> {
    let cat = state.snapshot.current();
    let out = cat
        .category_counts()
        .into_iter()
        .map(|(c, count)| CategoryOut {
            label: c.label(),
            count,
        })
        .collect();
    Json(out)
}

async fn category_quizzes(
    State(state): State<AppState>,
    Path(label): Path<String>,
) -> Result<Json<QuizList>, StatusCode> {
    let category = Category::from_label(&label).ok_or(StatusCode::NOT_FOUND)?;
    let cat = state.snapshot.current();
    let records = cat.by_category(category).into_iter().cloned().collect();
    Ok(Json(QuizList::new(cat.fetched_at_unix(), records)))
}

#[derive(serde::Serialize)]
struct RefreshOut {
    ingested: usize,
    serving: usize,
}

async fn admin_refresh(State(state): State<AppState>) -> Json<RefreshOut> {
    let ingested = refresh_once(&state.providers, &state.snapshot).await;
    Json(RefreshOut {
        ingested,
        serving: state.snapshot.current().len(),
    })
}
