pub mod client;
pub mod error;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::Gateway;
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
