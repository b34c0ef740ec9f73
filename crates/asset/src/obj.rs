//! Streaming OBJ parser supporting positions, normals and texture
//! coordinates, with face-vertex deduplication and fan triangulation.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::mesh::{MeshData, MeshVertex};

/// Parse failure, carrying the 1-based source line where applicable.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("i/o error while reading OBJ data")]
    Io(#[from] io::Error),
    #[error("line {line}: missing {what}")]
    MissingValue { line: usize, what: &'static str },
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: invalid face index '{token}'")]
    InvalidIndex { line: usize, token: String },
    #[error("line {line}: index {index} out of range (array has {len} entries)")]
    IndexOutOfRange { line: usize, index: i64, len: usize },
    #[error("no face produced any triangles")]
    EmptyMesh,
    #[error("vertex count exceeds u32 index range")]
    TooManyVertices,
}

/// Raw counts observed during a parse.
///
/// `face_corners` is the number of corner references before dedup; compare
/// against the output vertex count to see how much sharing the file had.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ObjStats {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
    pub faces: usize,
    pub face_corners: usize,
}

impl ObjStats {
    pub fn has_normals(&self) -> bool {
        self.normals > 0
    }

    pub fn has_texcoords(&self) -> bool {
        self.texcoords > 0
    }
}

/// A parsed OBJ: the indexed mesh plus the counts seen in the source.
#[derive(Clone, Debug)]
pub struct ObjMesh {
    pub mesh: MeshData,
    pub stats: ObjStats,
}

/// Post-parse fixups applied by [`load_mesh_from_path`].
#[derive(Clone, Copy, Debug)]
pub struct MeshOptions {
    /// Regenerate smooth normals even when the source carried `vn` data.
    /// Normals are always generated when the source has none.
    pub force_generate_normals: bool,
    /// Center at the centroid and scale into the unit sphere.
    pub normalize_positions: bool,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            force_generate_normals: false,
            normalize_positions: true,
        }
    }
}

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<ObjMesh> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open OBJ file: {}", path.display()))?;
    let parsed = parse_obj(BufReader::new(file))
        .with_context(|| format!("failed to parse OBJ file: {}", path.display()))?;
    log::debug!(
        "{}: {} vertices / {} triangles from {} corner refs",
        path.display(),
        parsed.mesh.vertices.len(),
        parsed.mesh.triangle_count(),
        parsed.stats.face_corners
    );
    Ok(parsed)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<ObjMesh> {
    Ok(parse_obj(reader)?)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<ObjMesh> {
    Ok(parse_obj(io::Cursor::new(contents))?)
}

/// Load an OBJ and apply the standard fixups: regenerate normals when the
/// source has none (or unconditionally, per options), then normalize
/// positions. Returns a mesh ready for upload.
pub fn load_mesh_from_path(path: impl AsRef<Path>, options: &MeshOptions) -> Result<MeshData> {
    let path = path.as_ref();
    let ObjMesh { mut mesh, stats } = load_obj_from_path(path)?;

    if options.force_generate_normals || !stats.has_normals() {
        if !stats.has_normals() {
            log::info!("{}: no vn data, generating smooth normals", path.display());
        }
        mesh.generate_smooth_normals();
    }
    if options.normalize_positions {
        mesh.normalize_positions();
    }
    Ok(mesh)
}

/// One output vertex per distinct (position, texture, normal) index triple.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
struct Corner(usize, Option<usize>, Option<usize>);

/// Single-pass parse of OBJ text into an indexed triangle mesh.
///
/// Faces with more than three corners are fan-triangulated; faces with
/// fewer are skipped. Directives other than `v`/`vt`/`vn`/`f` carry no
/// geometry and are ignored.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjMesh, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();

    let mut unique: HashMap<Corner, u32> = HashMap::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut stats = ObjStats::default();
    let mut face: Vec<u32> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else { continue };

        match tag {
            "v" => {
                // Extra components (w, vertex colors) are ignored.
                positions.push(parse_vec3(&mut parts, line_no)?);
                stats.positions += 1;
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push([u, v]);
                stats.texcoords += 1;
            }
            "vn" => {
                normals.push(parse_vec3(&mut parts, line_no)?);
                stats.normals += 1;
            }
            "f" => {
                stats.faces += 1;
                face.clear();
                for token in parts {
                    stats.face_corners += 1;
                    let corner = parse_corner(
                        token,
                        positions.len(),
                        texcoords.len(),
                        normals.len(),
                        line_no,
                    )?;
                    let index = match unique.get(&corner) {
                        Some(&idx) => idx,
                        None => {
                            // parse_corner already range-checked the triple.
                            let Corner(vi, vti, vni) = corner;
                            let position = positions[vi];
                            let uv = vti.map(|i| texcoords[i]).unwrap_or([0.0, 0.0]);
                            let normal = vni.map(|i| normals[i]).unwrap_or([0.0, 0.0, 1.0]);

                            let idx = u32::try_from(vertices.len())
                                .map_err(|_| ObjError::TooManyVertices)?;
                            vertices.push(MeshVertex::new(position, normal, uv));
                            unique.insert(corner, idx);
                            idx
                        }
                    };
                    face.push(index);
                }

                if face.len() < 3 {
                    continue;
                }
                // Triangulate fan: a quad becomes exactly two triangles.
                for i in 1..(face.len() - 1) {
                    indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            // o/g/s/usemtl/mtllib and friends.
            _ => {}
        }
    }

    if indices.is_empty() {
        return Err(ObjError::EmptyMesh);
    }

    Ok(ObjMesh {
        mesh: MeshData::new(vertices, indices),
        stats,
    })
}

/// Write a mesh as OBJ text: one `v`/`vt`/`vn` entry per vertex, faces
/// referencing the shared 1-based index.
pub fn write_obj<W: Write>(mesh: &MeshData, mut out: W) -> io::Result<()> {
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.position[0], v.position[1], v.position[2])?;
    }
    for v in &mesh.vertices {
        writeln!(out, "vt {} {}", v.uv[0], v.uv[1])?;
    }
    for v in &mesh.vertices {
        writeln!(out, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2])?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    Ok(())
}

/// Write a mesh as an OBJ file.
pub fn write_obj_to_path(mesh: &MeshData, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create OBJ file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_obj(mesh, &mut out)
        .and_then(|_| out.flush())
        .with_context(|| format!("failed to write OBJ file: {}", path.display()))?;
    Ok(())
}

fn parse_f32(token: Option<&str>, line: usize, what: &'static str) -> Result<f32, ObjError> {
    let token = token.ok_or(ObjError::MissingValue { line, what })?;
    token.parse::<f32>().map_err(|_| ObjError::InvalidNumber {
        line,
        token: token.to_owned(),
    })
}

fn parse_vec3<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; 3], ObjError> {
    Ok([
        parse_f32(parts.next(), line, "x component")?,
        parse_f32(parts.next(), line, "y component")?,
        parse_f32(parts.next(), line, "z component")?,
    ])
}

/// Split a face token (`p`, `p/t`, `p//n` or `p/t/n`) into resolved indices.
fn parse_corner(
    token: &str,
    pos_len: usize,
    tex_len: usize,
    norm_len: usize,
    line: usize,
) -> Result<Corner, ObjError> {
    let mut split = token.split('/');
    let pos = split
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ObjError::InvalidIndex {
            line,
            token: token.to_owned(),
        })?;
    let pos_idx = resolve_index(pos, pos_len, line)?;

    let tex_idx = match split.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, tex_len, line)?),
        _ => None,
    };
    let norm_idx = match split.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, norm_len, line)?),
        _ => None,
    };

    Ok(Corner(pos_idx, tex_idx, norm_idx))
}

/// Resolve a 1-based (or negative, end-relative) OBJ index against an
/// array of `len` entries. Zero is never a valid OBJ index.
fn resolve_index(token: &str, len: usize, line: usize) -> Result<usize, ObjError> {
    let raw: i64 = token.parse().map_err(|_| ObjError::InvalidIndex {
        line,
        token: token.to_owned(),
    })?;
    if raw == 0 {
        return Err(ObjError::InvalidIndex {
            line,
            token: token.to_owned(),
        });
    }

    let resolved = if raw > 0 {
        usize::try_from(raw - 1).ok()
    } else {
        usize::try_from(len as i64 + raw).ok()
    };

    match resolved {
        Some(idx) if idx < len => Ok(idx),
        _ => Err(ObjError::IndexOutOfRange {
            line,
            index: raw,
            len,
        }),
    }
}
