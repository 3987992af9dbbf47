//! Wavefront OBJ mesh loader.
//!
//! Supports `v`, `vt`, `vn` and `f` records with `v`, `v/vt`, `v//vn` and
//! `v/vt/vn` references (1-based, or negative for relative indexing).
//! Polygons are fan-triangulated. Other records are ignored.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use super::AssetError;

/// Indexed triangle mesh with one normal and UV per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Read and parse an OBJ file.
pub fn load_mesh(path: &Path) -> Result<Mesh, AssetError> {
    let content = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&content)
}

/// (position, uv, normal) indices into the raw attribute lists.
type VertexKey = (usize, Option<usize>, Option<usize>);

/// Parse OBJ text into an indexed mesh.
pub fn parse_obj(content: &str) -> Result<Mesh, AssetError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();

    let mut mesh = Mesh::default();
    // Vertex dedup by attribute triple
    let mut vertex_cache: HashMap<VertexKey, u32> = HashMap::new();
    // Vertices that need a flat normal computed after parsing
    let mut needs_normal: Vec<bool> = Vec::new();

    for (line_idx, raw) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        match keyword {
            "v" => positions.push(parse_floats::<3>(&args, line_no)?),
            "vn" => normals.push(parse_floats::<3>(&args, line_no)?),
            "vt" => uvs.push(parse_floats::<2>(&args, line_no)?),
            "f" => {
                if args.len() < 3 {
                    return Err(AssetError::parse(
                        line_no,
                        format!("face needs at least 3 vertices, got {}", args.len()),
                    ));
                }

                let keys = args
                    .iter()
                    .map(|spec| {
                        parse_face_vertex(spec, positions.len(), uvs.len(), normals.len(), line_no)
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let mut face_indices = Vec::with_capacity(keys.len());
                for key in keys {
                    let index = *vertex_cache.entry(key).or_insert_with(|| {
                        let (vi, ti, ni) = key;
                        mesh.positions.push(positions[vi]);
                        mesh.uvs.push(ti.map_or([0.0, 0.0], |t| uvs[t]));
                        mesh.normals.push(ni.map_or([0.0, 0.0, 0.0], |n| normals[n]));
                        needs_normal.push(ni.is_none());
                        (mesh.positions.len() - 1) as u32
                    });
                    face_indices.push(index);
                }

                // Fan triangulation
                for i in 1..face_indices.len() - 1 {
                    mesh.indices.extend_from_slice(&[
                        face_indices[0],
                        face_indices[i],
                        face_indices[i + 1],
                    ]);
                }
            }
            _ => {
                // o, g, s, usemtl, mtllib: not needed for a single-material mesh
            }
        }
    }

    if needs_normal.iter().any(|&n| n) {
        fill_flat_normals(&mut mesh, &needs_normal);
    }

    Ok(mesh)
}

fn parse_floats<const N: usize>(args: &[&str], line: usize) -> Result<[f32; N], AssetError> {
    if args.len() < N {
        return Err(AssetError::parse(
            line,
            format!("expected {N} components, got {}", args.len()),
        ));
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse::<f32>()
            .map_err(|_| AssetError::parse(line, format!("invalid number '{arg}'")))?;
    }
    Ok(out)
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn` into zero-based indices.
fn parse_face_vertex(
    spec: &str,
    position_count: usize,
    uv_count: usize,
    normal_count: usize,
    line: usize,
) -> Result<VertexKey, AssetError> {
    let mut fields = spec.split('/');
    let position = fields
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AssetError::parse(line, format!("missing position index in '{spec}'")))?;
    let position = resolve_index(position, position_count, line)?;

    let uv = match fields.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, uv_count, line)?),
        _ => None,
    };
    let normal = match fields.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, normal_count, line)?),
        _ => None,
    };

    Ok((position, uv, normal))
}

fn resolve_index(raw: &str, count: usize, line: usize) -> Result<usize, AssetError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| AssetError::parse(line, format!("invalid index '{raw}'")))?;

    let resolved = match value {
        v if v > 0 => v - 1,
        v if v < 0 => count as i64 + v,
        _ => return Err(AssetError::parse(line, "index 0 is not valid in OBJ")),
    };

    if resolved < 0 || resolved as usize >= count {
        return Err(AssetError::parse(
            line,
            format!("index {value} out of range ({count} defined)"),
        ));
    }
    Ok(resolved as usize)
}

/// Give vertices without an explicit normal the average of their faces' normals.
fn fill_flat_normals(mesh: &mut Mesh, needs_normal: &[bool]) {
    let mut accumulated = vec![Vec3::ZERO; mesh.positions.len()];

    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from(mesh.positions[a]);
        let pb = Vec3::from(mesh.positions[b]);
        let pc = Vec3::from(mesh.positions[c]);
        let face_normal = (pb - pa).cross(pc - pa);
        for i in [a, b, c] {
            accumulated[i] += face_normal;
        }
    }

    for (i, normal) in accumulated.into_iter().enumerate() {
        if needs_normal[i] {
            let normal = normal.normalize_or_zero();
            mesh.normals[i] = if normal == Vec3::ZERO { Vec3::Y } else { normal }.to_array();
        }
    }
}
