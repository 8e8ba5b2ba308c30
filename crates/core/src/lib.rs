pub mod error;
pub mod json;
pub mod transport;

pub use crate::core::error::{ApiError, TransportError};
pub use crate::core::transport::{ByteStream, HttpTransport, TransportConfig};
