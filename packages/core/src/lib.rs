// ABOUTME: Core types for Hubgate
// ABOUTME: Foundational package providing the normalized item shape shared across packages

pub mod types;

// Re-export main types
pub use types::IntegrationItem;
