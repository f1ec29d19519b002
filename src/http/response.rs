use serde_json::Value;

/// How much of a non-JSON body to keep for diagnostics.
const MAX_DISPLAY_BYTES: usize = 512;

/// The raw outcome of one HTTP call against the service under test.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    /// Status line, e.g. `200 OK`.
    pub status: String,
    pub duration_ms: u128,
    pub size_bytes: usize,
    pub body: String,
}

impl ServiceResponse {
    /// Decode the body as JSON; `None` when the service answered with
    /// something else (HTML error pages, empty bodies, ...).
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// The body truncated to a loggable size.
    pub fn display_body(&self) -> String {
        if self.body.len() <= MAX_DISPLAY_BYTES {
            return self.body.clone();
        }
        let mut end = MAX_DISPLAY_BYTES;
        while !self.body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes)", &self.body[..end], self.body.len())
    }
}
