//! Mesh export in world space: binary STL and Wavefront OBJ.

use std::path::Path;

use tracing::info;

use mitre_mesh::PolyMesh;
use mitre_scene::{ObjectId, Scene};

use crate::{MitreError, Result};

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Binary STL (triangulated).
    Stl,
    /// Wavefront OBJ (polygons kept).
    Obj,
}

impl ExportFormat {
    /// Pick a format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }
}

/// An object's mesh with its world transform applied.
pub fn world_mesh(scene: &Scene, object: ObjectId) -> Result<PolyMesh> {
    let data = scene.mesh(scene.object_mesh(object)?)?;
    let mut mesh = data.mesh.clone();
    mesh.transform(&scene.matrix_world(object)?);
    Ok(mesh)
}

/// Encode a mesh as binary STL.
///
/// Layout: 80-byte header, little-endian `u32` triangle count, then per
/// triangle a normal and three vertices as `f32` triples and a zero `u16`.
pub fn binary_stl(mesh: &PolyMesh, name: &str) -> Result<Vec<u8>> {
    let triangles = mesh.triangulate();
    if triangles.is_empty() {
        return Err(MitreError::NothingToExport(name.to_string()));
    }

    let mut buf = Vec::with_capacity(84 + triangles.len() * 50);
    let header = format!("binary STL: {name}");
    let header = header.as_bytes();
    buf.extend_from_slice(&header[..header.len().min(80)]);
    buf.resize(80, 0u8);
    buf.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for [a, b, c] in triangles {
        let (pa, pb, pc) = (mesh.vertices[a], mesh.vertices[b], mesh.vertices[c]);
        let n = (pb - pa).cross(&(pc - pa));
        let len = n.norm();
        let n = if len > 1e-12 { n / len } else { n };
        for value in [n.x, n.y, n.z] {
            buf.extend_from_slice(&(value as f32).to_le_bytes());
        }
        for p in [pa, pb, pc] {
            for value in [p.x, p.y, p.z] {
                buf.extend_from_slice(&(value as f32).to_le_bytes());
            }
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }
    Ok(buf)
}

/// Encode a mesh as Wavefront OBJ text. Faces keep their polygon loops;
/// loose edges become `l` records.
pub fn obj(mesh: &PolyMesh, name: &str) -> Result<String> {
    if mesh.faces.is_empty() && mesh.edges.is_empty() {
        return Err(MitreError::NothingToExport(name.to_string()));
    }
    let mut out = String::with_capacity(mesh.vertices.len() * 40 + mesh.faces.len() * 20);
    out.push_str(&format!("o {name}\n"));
    for p in &mesh.vertices {
        out.push_str(&format!("v {} {} {}\n", p.x, p.y, p.z));
    }
    for loop_ in &mesh.faces {
        let indices: Vec<String> = loop_.iter().map(|v| (v + 1).to_string()).collect();
        out.push_str(&format!("f {}\n", indices.join(" ")));
    }
    for [a, b] in &mesh.edges {
        out.push_str(&format!("l {} {}\n", a + 1, b + 1));
    }
    Ok(out)
}

/// Write an object's world-space mesh to `path` in the given format.
pub fn write_object(
    scene: &Scene,
    object: ObjectId,
    path: &Path,
    format: ExportFormat,
) -> Result<()> {
    let name = scene.object(object)?.name.clone();
    let mesh = world_mesh(scene, object)?;
    match format {
        ExportFormat::Stl => std::fs::write(path, binary_stl(&mesh, &name)?)?,
        ExportFormat::Obj => std::fs::write(path, obj(&mesh, &name)?)?,
    }
    info!(path = %path.display(), ?format, "exported mesh");
    Ok(())
}
