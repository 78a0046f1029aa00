//! Request models for the cache server API
//!
//! Keys arrive in the URL path and values as the raw request body; both are
//! checked here before they reach the engine.

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// A read of one key (GET /:key)
#[derive(Debug, Clone)]
pub struct GetRequest {
    /// The cache key
    pub key: String,
}

impl GetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// A write of one key (POST /:key)
#[derive(Debug, Clone)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
}

impl SetRequest {
    /// Builds a request from the path key and the raw body.
    ///
    /// Fails with a message if the body is not valid UTF-8.
    pub fn from_body(key: String, body: &[u8]) -> Result<Self, String> {
        let value = std::str::from_utf8(body)
            .map_err(|_| "Value must be valid UTF-8".to_string())?
            .to_owned();
        Ok(Self { key, value })
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_key(&self.key) {
            return Some(msg);
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Must provide a key in the path".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
