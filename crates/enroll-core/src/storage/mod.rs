//! Storage layer
//!
//! The hosted document database is reached through [`VendorClient`].
//! [`FallbackStore`] (DashMap, in-memory) serves whenever the vendor cannot.

pub mod fallback;
pub mod vendor;

pub use fallback::FallbackStore;
pub use vendor::{VendorClient, VendorConfig};
