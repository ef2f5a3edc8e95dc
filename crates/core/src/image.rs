use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Base64 text of a lesion photo, stored inline in the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageData(String);

impl ImageData {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Accepts already-encoded text. Empty text is rejected: a record without
    /// a photo carries `None`, not an empty image.
    pub fn from_base64(text: impl Into<String>) -> Result<Self, CoreError> {
        let text = text.into();
        if text.is_empty() {
            return Err(CoreError::InvalidImage("empty image text".into()));
        }
        STANDARD
            .decode(&text)
            .map_err(|e| CoreError::InvalidImage(e.to_string()))?;
        Ok(Self(text))
    }

    /// Wraps text read back from storage without re-validating it.
    pub(crate) fn from_stored(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        STANDARD
            .decode(&self.0)
            .map_err(|e| CoreError::InvalidImage(e.to_string()))
    }
}

impl TryFrom<String> for ImageData {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base64(value)
    }
}

impl From<ImageData> for String {
    fn from(value: ImageData) -> Self {
        value.0
    }
}
