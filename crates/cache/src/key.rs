//! Cache key derivation: `<endpoint>_<params as JSON>`.
//!
//! Params are serialized with serde_json, so struct fields appear in
//! declaration order and two logically identical requests always collide on
//! the same key. Requests without params use `{}`.

use insights_core::InsightsResult;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new<P: Serialize + ?Sized>(endpoint: &str, params: Option<&P>) -> InsightsResult<Self> {
        let params = match params {
            Some(p) => serde_json::to_string(p)?,
            None => "{}".to_string(),
        };
        Ok(Self(format!("{endpoint}_{params}")))
    }

    /// Key for an endpoint that takes no parameters.
    pub fn bare(endpoint: &str) -> Self {
        Self(format!("{endpoint}_{{}}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
