//! Shared helpers: HTML escaping and content hashing.

pub mod hash;
pub mod html;
