//! Camera Module
//!
//! Camera-space math used for hit testing. Window-system agnostic.

pub mod raycast;

pub use raycast::{Ray, intersect_plane, screen_to_ray};
