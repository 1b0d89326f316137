//! Outbound page fetching.
//!
//! The pipeline only talks to the `HttpClient` trait so tests can swap in
//! `MockClient` and assert on how many requests were made.

pub(crate) mod charset;
mod client;

pub use client::{
    is_text_content_type, BrowserClient, BrowserClientBuilder, HttpClient, MockClient,
    MockResponse,
};

/// Desktop Chrome identity sent with every page fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
