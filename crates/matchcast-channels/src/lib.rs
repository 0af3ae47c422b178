//! # Matchcast Channels
//!
//! Social channel adapter implementations. Every adapter follows the same
//! `ChannelAdapter` trait: `(content, image_url)` in, success or a
//! descriptive failure out, no internal retries.

pub mod facebook;
pub mod instagram;
pub mod registry;

pub use facebook::FacebookAdapter;
pub use instagram::InstagramAdapter;
pub use registry::{AdapterRegistry, TwitterAdapter};
