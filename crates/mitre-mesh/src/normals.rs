//! Consistent face winding.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::mesh::signed_volume_of;
use crate::PolyMesh;

impl PolyMesh {
    /// Rewind faces so neighbours agree and each connected part faces outward.
    ///
    /// Winding is propagated across edges shared by exactly two faces: the two
    /// faces must traverse the edge in opposite directions. Each connected
    /// part is then flipped as a whole if its signed volume is negative.
    /// Returns the number of faces whose winding changed.
    pub fn recalc_normals_outside(&mut self) -> usize {
        let nf = self.faces.len();
        let mut adjacency: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for f in 0..nf {
            for (a, b) in self.face_edges(f) {
                adjacency.entry((a.min(b), a.max(b))).or_default().push(f);
            }
        }

        let mut flipped = vec![false; nf];
        let mut component = vec![usize::MAX; nf];
        let mut components = 0;

        for seed in 0..nf {
            if component[seed] != usize::MAX {
                continue;
            }
            component[seed] = components;
            let mut queue = VecDeque::from([seed]);
            while let Some(f) = queue.pop_front() {
                let edges: Vec<_> = self.face_edges(f).collect();
                for (a, b) in edges {
                    let (a, b) = if flipped[f] { (b, a) } else { (a, b) };
                    let shared = &adjacency[&(a.min(b), a.max(b))];
                    if shared.len() != 2 {
                        continue;
                    }
                    let g = if shared[0] == f { shared[1] } else { shared[0] };
                    if component[g] != usize::MAX {
                        continue;
                    }
                    component[g] = components;
                    // g must run b -> a; flip it if it runs a -> b.
                    flipped[g] = self.face_edges(g).any(|e| e == (a, b));
                    queue.push_back(g);
                }
            }
            components += 1;
        }

        let mut volume = vec![0.0; components];
        for f in 0..nf {
            let mut loop_ = self.faces[f].clone();
            if flipped[f] {
                loop_.reverse();
            }
            volume[component[f]] += signed_volume_of(&self.vertices, &loop_);
        }

        let mut changed = 0;
        for f in 0..nf {
            if flipped[f] != (volume[component[f]] < 0.0) {
                self.faces[f].reverse();
                changed += 1;
            }
        }
        debug!(components, changed, "recalculated normals");
        changed
    }
}
