//! fsdt-webhdfs - WebHDFS-backed filesystem handles.
//!
//! Handles for the two HTTP-tunneled protocols. They declare the token kind
//! their protocol needs and issue and cancel delegation tokens through the
//! namenode's REST API.

mod client;
mod endpoints;
mod filesystem;

pub use client::WebHdfsClient;
pub use filesystem::WebHdfsFileSystem;
