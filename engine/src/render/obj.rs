//! Wavefront OBJ Loader
//!
//! Reads the subset of OBJ used by the demo models: `v`, `vt`, `vn` and `f`
//! records. Faces may reference `v`, `v/vt`, `v//vn` or `v/vt/vn`; polygons
//! with more than three corners are fan-triangulated. Other records
//! (`o`, `g`, `s`, `usemtl`, `mtllib`, comments) are ignored.

use std::collections::HashMap;
use std::path::Path;

use super::mesh::{Mesh, Vertex};
use crate::error::AssetError;

/// Load and parse an OBJ file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
    let mesh = parse_obj(&source).map_err(|(line, message)| AssetError::Mesh {
        path: path.to_path_buf(),
        line,
        message,
    })?;
    log::debug!(
        "Loaded {} ({} vertices, {} triangles)",
        path.display(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// One face corner: indices into the position, texcoord and normal pools.
type Corner = (usize, Option<usize>, Option<usize>);

/// Parse OBJ text. Errors carry the 1-based line number and a message.
pub fn parse_obj(source: &str) -> Result<Mesh, (usize, String)> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut mesh = Mesh::default();
    let mut dedup: HashMap<Corner, u32> = HashMap::new();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => positions.push(parse_floats::<3>(tokens, line_no)?),
            "vt" => {
                // A third (w) component is allowed and ignored
                let [u, v] = parse_floats::<2>(tokens, line_no)?;
                tex_coords.push([u, v]);
            }
            "vn" => normals.push(parse_floats::<3>(tokens, line_no)?),
            "f" => {
                let corners = tokens
                    .map(|t| {
                        parse_corner(t, positions.len(), tex_coords.len(), normals.len())
                            .map_err(|m| (line_no, m))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err((line_no, format!("face has {} corners", corners.len())));
                }

                let mut resolved = Vec::with_capacity(corners.len());
                for corner in corners {
                    let id = *dedup.entry(corner).or_insert_with(|| {
                        let (p, t, n) = corner;
                        mesh.vertices.push(Vertex::new(
                            positions[p],
                            n.map_or([0.0, 0.0, 0.0], |n| normals[n]),
                            t.map_or([0.0, 0.0], |t| {
                                // OBJ puts v=0 at the bottom of the image
                                let [u, v] = tex_coords[t];
                                [u, 1.0 - v]
                            }),
                        ));
                        (mesh.vertices.len() - 1) as u32
                    });
                    resolved.push(id);
                }
                for i in 1..resolved.len() - 1 {
                    mesh.indices
                        .extend_from_slice(&[resolved[0], resolved[i], resolved[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if mesh.is_empty() {
        return Err((source.lines().count(), "no faces".to_string()));
    }
    Ok(mesh)
}

fn parse_floats<'a, const N: usize>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], (usize, String)> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let token = tokens
            .next()
            .ok_or_else(|| (line, format!("expected {N} numbers")))?;
        *slot = token
            .parse()
            .map_err(|_| (line, format!("invalid number {token:?}")))?;
    }
    Ok(out)
}

/// Resolve a 1-based (or negative, relative) OBJ index against a pool size.
fn resolve_index(token: &str, len: usize) -> Result<usize, String> {
    let raw: i64 = token
        .parse()
        .map_err(|_| format!("invalid index {token:?}"))?;
    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        len as i64 + raw
    } else {
        return Err("index 0 is not valid".to_string());
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(format!("index {raw} out of range (have {len})"));
    }
    Ok(resolved as usize)
}

fn parse_corner(token: &str, n_pos: usize, n_tex: usize, n_norm: usize) -> Result<Corner, String> {
    let mut parts = token.split('/');
    let p = resolve_index(parts.next().unwrap_or(""), n_pos)?;
    let t = match parts.next() {
        Some("") | None => None,
        Some(s) => Some(resolve_index(s, n_tex)?),
    };
    let n = match parts.next() {
        Some("") | None => None,
        Some(s) => Some(resolve_index(s, n_norm)?),
    };
    Ok((p, t, n))
}
