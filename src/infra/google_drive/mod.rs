// Google Drive infra layer.
// - `reqwest_transport.rs` executes store requests over HTTP.

#[path = "reqwest_transport.rs"]
pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
