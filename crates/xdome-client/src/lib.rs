//! # xDome Client
//!
//! Authenticated HTTP access to the xDome REST API.
//!
//! ## Request Rules
//!
//! - Every request carries `Authorization: Bearer <api_key>` and
//!   `Content-Type: application/json`
//! - The server URL is normalized once (`https://` by default, no trailing `/`)
//! - One attempt per call; failures surface immediately

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod server_url;

pub use client::{ClientError, Reply, XdomeClient, XdomeClientConfig};
pub use reqwest::Method;
pub use server_url::{join_endpoint, normalize_base_url, UrlError};
