//! Per-scene operator settings.

use serde::{Deserialize, Serialize};

use mitre_scene::{MeshId, ObjectId, Scene};

use crate::{MitreError, Result};

/// Inputs the operators read besides the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnglesSettings {
    /// Mesh used as the joint profile by `angles.add_angle`.
    pub profile: Option<MeshId>,
    /// Object moved by `angles.align_object`.
    pub to_align: Option<ObjectId>,
}

impl AnglesSettings {
    /// Check that every set handle resolves in `scene`.
    pub fn validate(&self, scene: &Scene) -> Result<()> {
        if let Some(profile) = self.profile {
            if scene.mesh(profile).is_err() {
                return Err(MitreError::InvalidSettings(
                    "profile mesh no longer exists".into(),
                ));
            }
        }
        if let Some(target) = self.to_align {
            if !scene.contains_object(target) {
                return Err(MitreError::InvalidSettings(
                    "object to align no longer exists".into(),
                ));
            }
        }
        Ok(())
    }
}
