// Core functionality for the tutor content toolkit:
// - API client for Gemini
// - Request/response data structures
// - Response schemas for structured generation
// - Domain model and response normalization
// - Capability gateway over the generative backend
// - Configuration loading
// - Shared error types

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export schema module - Response schemas for structured generation
pub mod schema;

// Export model module - Domain data model
pub mod model;
pub use model::*;

// Export normalize module - Parsing and validation of model output
pub mod normalize;

// Export gateway module - Capability layer over the backend
pub mod gateway;
pub use gateway::{Gateway, GenerativeBackend};

// Export data_uri module - Image transport encoding helpers
pub mod data_uri;
