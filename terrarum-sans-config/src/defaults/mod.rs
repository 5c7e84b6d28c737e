//! Default value functions for configuration.
//!
//! Each sub-module groups related free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `FontConfig`
//! fields.

mod cache;
mod layout;

// ── Layout ─────────────────────────────────────────────────────────────────
pub use layout::{interchar, kerning, scale, strict_metadata};

// ── Shaping cache ──────────────────────────────────────────────────────────
pub use cache::{cache_capacity, first_use_rebuild};
