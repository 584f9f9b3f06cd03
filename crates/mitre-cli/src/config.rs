//! TOML joint description.
//!
//! ```toml
//! name = "Frame"
//!
//! [profile]
//! kind = "rectangle"
//! x = 0.5
//! y = 0.0
//! width = 1.0
//! height = 1.0
//!
//! [corner]
//! points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]
//!
//! [host]
//! translation = [0.0, 0.0, 2.0]
//! rotation_deg = [0.0, 0.0, 30.0]
//! ```

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;

use mitre::math::{Point3, Transform};
use mitre::mesh::PolyMesh;
use mitre::scene::ObjectData;
use mitre::{MeshId, ObjectId, Scene};

/// Profile shape, drawn in the XY plane of the corner frame.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileConfig {
    /// Axis-aligned rectangle with its minimum corner at `(x, y)`.
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Regular polygon around `center`.
    RegularPolygon {
        radius: f64,
        sides: usize,
        #[serde(default)]
        center: [f64; 2],
    },
    /// A single face through the given points.
    Polygon { points: Vec<[f64; 2]> },
    /// An open (or closed) chain of edges without a face.
    Polyline {
        points: Vec<[f64; 2]>,
        #[serde(default)]
        closed: bool,
    },
}

impl ProfileConfig {
    /// Build the profile mesh.
    pub fn build(&self) -> Result<PolyMesh> {
        let flat = |points: &[[f64; 2]]| -> Vec<Point3> {
            points.iter().map(|[x, y]| Point3::new(*x, *y, 0.0)).collect()
        };
        Ok(match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                ensure!(
                    *width > 0.0 && *height > 0.0,
                    "rectangle width and height must be positive"
                );
                PolyMesh::rectangle(*x, *y, *width, *height)
            }
            Self::RegularPolygon {
                radius,
                sides,
                center,
            } => {
                ensure!(*radius > 0.0, "polygon radius must be positive");
                ensure!(*sides >= 3, "polygon needs at least 3 sides");
                let mut mesh = PolyMesh::regular_polygon(*radius, *sides);
                mesh.transform(&Transform::translation(center[0], center[1], 0.0));
                mesh
            }
            Self::Polygon { points } => PolyMesh::from_polygon(&flat(points))?,
            Self::Polyline { points, closed } => PolyMesh::polyline(&flat(points), *closed)?,
        })
    }
}

/// The three picked points on the host path.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CornerConfig {
    /// Start, corner, end.
    pub points: [[f64; 3]; 3],
    /// Swap start and end.
    #[serde(default)]
    pub inverse: bool,
}

/// Placement of the host object holding the corner.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// World translation.
    pub translation: [f64; 3],
    /// Rotation about X, then Y, then Z, in degrees.
    pub rotation_deg: [f64; 3],
    /// Uniform scale.
    pub scale: f64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation_deg: [0.0; 3],
            scale: 1.0,
        }
    }
}

impl HostConfig {
    /// The host's world transform.
    pub fn transform(&self) -> Transform {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation_deg.map(f64::to_radians);
        Transform::translation(tx, ty, tz)
            .then(&Transform::rotation_z(rz))
            .then(&Transform::rotation_y(ry))
            .then(&Transform::rotation_x(rx))
            .then(&Transform::scale(self.scale, self.scale, self.scale))
    }
}

fn default_name() -> String {
    "Profile".to_string()
}

/// A complete joint description.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JointConfig {
    /// Name of the profile mesh and of the resulting joint object.
    #[serde(default = "default_name")]
    pub name: String,
    /// Profile shape.
    pub profile: ProfileConfig,
    /// Picked corner.
    pub corner: CornerConfig,
    /// Host placement.
    #[serde(default)]
    pub host: HostConfig,
}

/// A scene built from a [`JointConfig`].
pub struct JointScene {
    pub scene: Scene,
    pub host: ObjectId,
    pub profile: MeshId,
}

impl JointConfig {
    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("parsing joint description")?;
        if config.host.scale == 0.0 || !config.host.scale.is_finite() {
            bail!("host scale must be finite and non-zero");
        }
        Ok(config)
    }

    /// Build a scene: the host path with its three vertices picked in order
    /// and made active, plus the profile mesh.
    pub fn build_scene(&self) -> Result<JointScene> {
        let mut scene = Scene::new();
        let points: Vec<Point3> = self
            .corner
            .points
            .iter()
            .map(|[x, y, z]| Point3::new(*x, *y, *z))
            .collect();
        let path = PolyMesh::polyline(&points, false)?;
        let host_mesh = scene.add_mesh("Path", path);
        let host = scene.add_object("Path", ObjectData::Mesh(host_mesh));
        scene.object_mut(host)?.matrix_basis = self.host.transform();
        for v in 0..points.len() {
            scene.select_vertex(host_mesh, v)?;
        }
        scene.set_active(Some(host))?;
        scene.set_selected(host, true)?;

        let profile = scene.add_mesh(self.name.clone(), self.profile.build()?);
        Ok(JointScene {
            scene,
            host,
            profile,
        })
    }
}
