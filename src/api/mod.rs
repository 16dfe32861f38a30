use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};

use crate::{
    agent::TravelAgent,
    models::{
        AnswerResponse, ModifiedPlanResponse, ModifyRequest, QuestionRequest, TravelPlanResponse,
        TravelPreferences,
    },
};

mod error;

pub use error::ApiError;

type AgentState = State<Arc<TravelAgent>>;

pub fn router(agent: Arc<TravelAgent>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/generate-plan", post(generate_plan))
        .route("/answer-question", post(answer_question))
        .route("/modify-plan", post(modify_plan))
        .with_state(agent)
}

async fn home() -> &'static str {
    "Hi"
}

async fn generate_plan(
    State(agent): AgentState,
    payload: Result<Json<TravelPreferences>, JsonRejection>,
) -> Result<Json<TravelPlanResponse>, ApiError> {
    let Json(preferences) = payload?;
    let travel_plan = agent.generate_travel_plan(&preferences).await?;
    Ok(Json(TravelPlanResponse { travel_plan }))
}

async fn answer_question(
    State(agent): AgentState,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let Json(request) = payload?;
    let answer = agent.answer_question(&request).await?;
    Ok(Json(AnswerResponse { answer }))
}

async fn modify_plan(
    State(agent): AgentState,
    payload: Result<Json<ModifyRequest>, JsonRejection>,
) -> Result<Json<ModifiedPlanResponse>, ApiError> {
    let Json(request) = payload?;
    let modified_plan = agent.modify_plan(&request).await?;
    Ok(Json(ModifiedPlanResponse { modified_plan }))
}
