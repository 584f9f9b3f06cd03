//! Merge-by-distance and coincident face removal.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use mitre_math::Point3;

use crate::PolyMesh;

/// Default merge distance for [`PolyMesh::remove_doubles`].
pub const DEFAULT_MERGE_DISTANCE: f64 = 1e-4;

/// What a weld pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldReport {
    /// Vertices merged into an earlier vertex.
    pub vertices_removed: usize,
    /// Faces dropped because they collapsed below three distinct corners.
    pub faces_removed: usize,
    /// Loose edges dropped because they collapsed or duplicated another edge.
    pub edges_removed: usize,
}

/// Uniform grid bucketing vertices by position for neighbour lookups.
struct SpatialHash {
    cell: f64,
    buckets: HashMap<[i64; 3], Vec<usize>>,
}

impl SpatialHash {
    fn new(cell: f64) -> Self {
        Self {
            cell,
            buckets: HashMap::new(),
        }
    }

    fn key(&self, p: &Point3) -> [i64; 3] {
        [
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
            (p.z / self.cell).floor() as i64,
        ]
    }

    fn insert(&mut self, p: &Point3, index: usize) {
        let key = self.key(p);
        self.buckets.entry(key).or_default().push(index);
    }

    /// Indices stored in the cell of `p` and its 26 neighbours.
    fn neighbours(&self, p: &Point3) -> impl Iterator<Item = usize> + '_ {
        let [x, y, z] = self.key(p);
        (-1..=1)
            .flat_map(move |dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (dx, dy, dz))))
            .filter_map(move |(dx, dy, dz)| self.buckets.get(&[x + dx, y + dy, z + dz]))
            .flatten()
            .copied()
    }
}

impl PolyMesh {
    /// Merge vertices closer than `distance`, keeping the first of each
    /// cluster in index order.
    ///
    /// Faces are remapped and lose repeated consecutive corners; faces left
    /// with fewer than three corners are dropped. Loose edges that collapse,
    /// repeat, or coincide with a face edge are dropped.
    #[instrument(skip(self), fields(vertices = self.vertices.len()))]
    pub fn remove_doubles(&mut self, distance: f64) -> WeldReport {
        let cell = if distance > 0.0 { distance } else { 1e-12 };
        let mut grid = SpatialHash::new(cell);
        let mut kept: Vec<Point3> = Vec::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());

        for p in &self.vertices {
            let hit = grid
                .neighbours(p)
                .find(|&k| (kept[k] - p).norm() <= distance);
            match hit {
                Some(k) => remap.push(k),
                None => {
                    grid.insert(p, kept.len());
                    remap.push(kept.len());
                    kept.push(*p);
                }
            }
        }

        let mut report = WeldReport {
            vertices_removed: self.vertices.len() - kept.len(),
            ..WeldReport::default()
        };
        self.vertices = kept;

        let faces_before = self.faces.len();
        self.faces = std::mem::take(&mut self.faces)
            .into_iter()
            .filter_map(|loop_| collapse_loop(loop_.iter().map(|&v| remap[v]).collect()))
            .collect();
        report.faces_removed = faces_before - self.faces.len();

        let face_edges: HashSet<(usize, usize)> = (0..self.faces.len())
            .flat_map(|f| self.face_edges(f).collect::<Vec<_>>())
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        let mut seen = HashSet::new();
        let edges_before = self.edges.len();
        self.edges = std::mem::take(&mut self.edges)
            .into_iter()
            .map(|[a, b]| [remap[a], remap[b]])
            .filter(|&[a, b]| {
                let key = (a.min(b), a.max(b));
                a != b && !face_edges.contains(&key) && seen.insert(key)
            })
            .collect();
        report.edges_removed = edges_before - self.edges.len();

        debug!(?report, "welded vertices");
        report
    }

    /// Delete every face whose corner set equals that of another face.
    ///
    /// After two solids are welded along a shared cut, the cut faces of both
    /// become such a pair and form an interior wall; removing them leaves the
    /// outer shell. Returns the number of faces removed.
    pub fn delete_coincident_faces(&mut self) -> usize {
        let key = |loop_: &Vec<usize>| {
            let mut k = loop_.clone();
            k.sort_unstable();
            k
        };
        let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
        for loop_ in &self.faces {
            *counts.entry(key(loop_)).or_insert(0) += 1;
        }
        let before = self.faces.len();
        self.faces.retain(|loop_| counts[&key(loop_)] == 1);
        let removed = before - self.faces.len();
        debug!(removed, "deleted coincident faces");
        removed
    }

    /// Count vertices lying within `distance` of an earlier vertex.
    pub fn count_duplicate_vertices(&self, distance: f64) -> usize {
        let mut grid = SpatialHash::new(if distance > 0.0 { distance } else { 1e-12 });
        let mut duplicates = 0;
        for (i, p) in self.vertices.iter().enumerate() {
            if grid
                .neighbours(p)
                .any(|k| (self.vertices[k] - p).norm() <= distance)
            {
                duplicates += 1;
            } else {
                grid.insert(p, i);
            }
        }
        duplicates
    }
}

/// Drop repeated consecutive corners (cyclically); `None` if fewer than
/// three remain.
fn collapse_loop(mut loop_: Vec<usize>) -> Option<Vec<usize>> {
    loop_.dedup();
    while loop_.len() > 1 && loop_.first() == loop_.last() {
        loop_.pop();
    }
    (loop_.len() >= 3).then_some(loop_)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mitre_math::Vec3;

    #[test]
    fn test_remove_doubles_merges_nearby_vertices() {
        let mut mesh = PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0);
        let other = PolyMesh::rectangle(1.0 + 1e-6, 0.0, 1.0, 1.0);
        mesh.append(&other);
        let report = mesh.remove_doubles(DEFAULT_MERGE_DISTANCE);

        assert_eq!(report.vertices_removed, 2);
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.faces[1], vec![1, 4, 5, 2]);
        assert_eq!(mesh.count_duplicate_vertices(DEFAULT_MERGE_DISTANCE), 0);
    }

    #[test]
    fn test_remove_doubles_drops_collapsed_faces() {
        let mut mesh = PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0);
        mesh.extrude_region(&Vec3::new(0.0, 0.0, 0.0)).unwrap();
        let report = mesh.remove_doubles(DEFAULT_MERGE_DISTANCE);

        assert_eq!(report.vertices_removed, 4);
        // The four side quads collapse to edges; both caps survive.
        assert_eq!(report.faces_removed, 4);
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_remove_doubles_drops_redundant_loose_edges() {
        let mut mesh = PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0);
        mesh.add_edge(0, 1).unwrap();
        let dup = mesh.add_vertex(mesh.vertices[3]);
        mesh.add_edge(2, dup).unwrap();
        let report = mesh.remove_doubles(DEFAULT_MERGE_DISTANCE);
        assert_eq!(report.edges_removed, 2);
        assert!(mesh.edges.is_empty());
    }

    #[test]
    fn test_delete_coincident_faces() {
        let mut mesh = PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0);
        mesh.add_face(vec![3, 2, 1, 0]).unwrap();
        mesh.add_vertex(mitre_math::Point3::new(0.5, 0.5, 1.0));
        mesh.add_face(vec![0, 1, 4]).unwrap();
        assert_eq!(mesh.delete_coincident_faces(), 2);
        assert_eq!(mesh.faces, vec![vec![0, 1, 4]]);
    }

    #[test]
    fn test_collapse_loop() {
        assert_eq!(collapse_loop(vec![1, 1, 2, 3, 1]), Some(vec![1, 2, 3]));
        assert_eq!(collapse_loop(vec![4, 5, 5, 4]), None);
    }
}
