/**
 * Routes Module
 * API route handlers
 */

pub mod blog;
pub mod chat;
pub mod health;

use serde::{Deserialize, Serialize};

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
