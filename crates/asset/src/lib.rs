//! Asset loading/parsers (meshes, textures).
//! OBJ mesh import with face-vertex dedup and fan triangulation,
//! plus RGBA8 texture decoding.

pub mod mesh;
pub mod obj;
pub mod texture;
