//! Flutter-facing bindings for the user registry.

pub mod api;
