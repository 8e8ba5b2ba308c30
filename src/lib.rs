#[path = "../crates/core/src/lib.rs"]
pub mod core;
#[path = "../crates/streaming-sse/src/lib.rs"]
pub mod streaming_sse;
#[path = "../crates/transports/reqwest/src/lib.rs"]
pub mod transport_reqwest;

#[path = "../crates/client/src/lib.rs"]
pub mod client;
#[path = "../crates/harness/src/lib.rs"]
pub mod harness;

pub mod transports {
    pub use crate::transport_reqwest as reqwest;
}

pub(crate) use crate::client as api_client;
pub(crate) use crate::core as harness_core;
pub(crate) use crate::streaming_sse as harness_sse;
pub(crate) use crate::transport_reqwest as reqwest_transport;
