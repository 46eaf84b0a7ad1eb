//! Flutter-facing bindings for QuickList core.

pub mod api;
