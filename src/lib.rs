// ABOUTME: Library root for clawpost — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod attachments;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod host;
pub mod logging;
pub mod message;
pub mod responses;
pub mod session;
