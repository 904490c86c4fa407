//! Terraport: put players on a world map where they are on Earth.
//!
//! An address or place name is resolved to latitude/longitude through an
//! HTTP provider (with caching and a built-in fallback table), then
//! projected onto the world's x/z plane.

pub mod command;
pub mod config;
pub mod http;
pub mod location;
pub mod projection;
pub mod server;
pub mod session;
