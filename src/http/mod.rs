//! HTTP transport against the service under test.

pub mod client;
pub mod method;
pub mod response;

pub use client::ApiClient;
pub use method::HttpMethod;
pub use response::ServiceResponse;
