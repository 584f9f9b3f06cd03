//! Polygon triangulation for export.
//!
//! Each face is projected onto the plane most perpendicular to its normal
//! and split by ear clipping. Faces that refuse to clip (self-intersecting
//! loops) fall back to a fan.

use mitre_math::Vec3;

use crate::PolyMesh;

impl PolyMesh {
    /// Triangles covering every face, wound like their face.
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        let mut out = Vec::new();
        for f in 0..self.faces.len() {
            let loop_ = &self.faces[f];
            if loop_.len() == 3 {
                out.push([loop_[0], loop_[1], loop_[2]]);
                continue;
            }
            let normal = self.face_area_vector(f);
            let pts: Vec<[f64; 2]> = loop_
                .iter()
                .map(|&v| project(&self.vertices[v].coords, &normal))
                .collect();
            match ear_clip(&pts) {
                Some(tris) => out.extend(
                    tris.into_iter()
                        .map(|[a, b, c]| [loop_[a], loop_[b], loop_[c]]),
                ),
                None => out.extend((1..loop_.len() - 1).map(|i| [loop_[0], loop_[i], loop_[i + 1]])),
            }
        }
        out
    }
}

/// Drop the dominant axis of `normal`, keeping the 2D winding consistent
/// with the 3D winding seen from the normal side.
fn project(p: &Vec3, normal: &Vec3) -> [f64; 2] {
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    if az >= ax && az >= ay {
        if normal.z >= 0.0 {
            [p.x, p.y]
        } else {
            [p.y, p.x]
        }
    } else if ax >= ay {
        if normal.x >= 0.0 {
            [p.y, p.z]
        } else {
            [p.z, p.y]
        }
    } else if normal.y >= 0.0 {
        [p.z, p.x]
    } else {
        [p.x, p.z]
    }
}

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn inside_triangle(p: [f64; 2], a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear clipping on a counter-clockwise polygon. Returns local index triples.
fn ear_clip(pts: &[[f64; 2]]) -> Option<Vec<[usize; 3]>> {
    let mut remaining: Vec<usize> = (0..pts.len()).collect();
    let mut tris = Vec::with_capacity(pts.len().saturating_sub(2));

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let (a, b, c) = (
                remaining[(i + n - 1) % n],
                remaining[i],
                remaining[(i + 1) % n],
            );
            if cross(pts[a], pts[b], pts[c]) <= 0.0 {
                return false;
            }
            remaining
                .iter()
                .filter(|&&k| k != a && k != b && k != c)
                .all(|&k| !inside_triangle(pts[k], pts[a], pts[b], pts[c]))
        })?;
        tris.push([
            remaining[(ear + n - 1) % n],
            remaining[ear],
            remaining[(ear + 1) % n],
        ]);
        remaining.remove(ear);
    }
    tris.push([remaining[0], remaining[1], remaining[2]]);
    Some(tris)
}
