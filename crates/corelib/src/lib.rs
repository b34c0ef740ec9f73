//! Math core: glam re-exports and bounding volumes.

pub use glam::{Mat4, Vec2, Vec3, vec2, vec3};

pub mod aabb;

pub use aabb::Aabb;
