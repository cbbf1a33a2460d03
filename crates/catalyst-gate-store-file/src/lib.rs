// crates/catalyst-gate-store-file/src/lib.rs
// ============================================================================
// Module: Catalyst Gate File Store Library
// Description: File-backed persistence for the Catalyst Gate core seams.
// Purpose: Provide the production usage store and license file loader.
// Dependencies: catalyst-gate-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This crate implements the core persistence seams over plain files next to
//! the deployment: a JSON usage store with atomic temp-write-then-rename
//! saves, and a comment-tolerant license file loader. Both degrade
//! gracefully on bad input and fail closed only where data would otherwise
//! be lost.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod loader;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use loader::DEFAULT_LICENSE_FILE;
pub use loader::FileLicenseSource;
pub use store::DEFAULT_USAGE_FILE;
pub use store::FileUsageStore;
