//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `synthesis` - Batch start and status check
//! - `sync_tts` - Synchronous synthesis of short texts
//! - `voices` - Voice, style and preset catalogue

pub mod api;
pub mod sync_tts;
pub mod synthesis;
pub mod voices;
