//! User profile entity.

use serde::{Deserialize, Serialize};

/// UserProfile is the persisted profile slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(rename = "twoFA")]
    pub two_fa: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: "guest".to_string(),
            two_fa: false,
        }
    }
}
