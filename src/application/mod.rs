// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above services and wires them together
// - Provides the boundary between UI and services
// - Translates internal errors into user-facing responses

pub mod error_handling;
pub mod state;

pub use error_handling::{ErrorResponse, ErrorType};
pub use state::AppState;
