//! Resolution service response types.

use serde::{Deserialize, Serialize};

/// Response from `POST /api/media`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Canonical origin URL of the media.
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResolutionMeta>,
}

/// Optional metadata the service may attach. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_content_type: Option<String>,
}

impl Resolution {
    /// The declared content type, if the service sent a non-empty one.
    pub fn expected_content_type(&self) -> Option<&str> {
        self.meta
            .as_ref()
            .and_then(|m| m.expected_content_type.as_deref())
            .filter(|s| !s.is_empty())
    }
}
