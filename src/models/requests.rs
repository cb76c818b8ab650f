use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to match vendors from a free-text requirement
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NlMatchRequest {
    #[validate(length(min = 1, max = 2000))]
    #[serde(alias = "text")]
    pub query: String,
}
