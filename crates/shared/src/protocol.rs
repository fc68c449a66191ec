use serde::{Deserialize, Serialize};

use crate::domain::{ActionItem, FinancialRecord, Identity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub identity: Identity,
}

/// Response to a token resolution probe. `identity` is absent when the token
/// is unknown or expired; that is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialsResponse {
    pub records: Vec<FinancialRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItemsResponse {
    pub items: Vec<ActionItem>,
}

/// Payload for the external text-insight backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub model: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub text: String,
}
