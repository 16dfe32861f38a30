//! Data models for the travel agent service
//!
//! This module contains the request and response payloads organized by concern:
//! - Trip: preferences for a new plan and the validated trip dates
//! - Requests: follow-up questions and modifications on an existing plan
//! - Responses: JSON bodies returned by the HTTP API

pub mod requests;
pub mod responses;
pub mod trip;

// Re-export all public types for convenient access
pub use requests::{ModifyRequest, QuestionRequest};
pub use responses::{AnswerResponse, ErrorResponse, ModifiedPlanResponse, TravelPlanResponse};
pub use trip::{TravelPreferences, TripDates};
