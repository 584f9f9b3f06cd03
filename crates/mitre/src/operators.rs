//! Named commands a host binds to buttons or menu entries.
//!
//! Each operator wraps one public operation and turns failure into a
//! cancelled result with a fixed, user-facing report.

use tracing::debug;

use mitre_scene::Scene;

use crate::settings::AnglesSettings;
use crate::{add_angle, align_object, set_orientation};

/// Outcome of running an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorResult {
    /// The operation completed.
    Finished,
    /// Nothing was changed.
    Cancelled,
}

/// Result plus messages for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Whether the operator completed.
    pub result: OperatorResult,
    /// Error reports to show the user.
    pub reports: Vec<String>,
}

impl Execution {
    fn finished() -> Self {
        Self {
            result: OperatorResult::Finished,
            reports: Vec::new(),
        }
    }

    fn cancelled(report: &str) -> Self {
        Self {
            result: OperatorResult::Cancelled,
            reports: vec![report.to_string()],
        }
    }

    fn from_success(ok: bool, report: &str) -> Self {
        if ok {
            Self::finished()
        } else {
            Self::cancelled(report)
        }
    }
}

/// A named, undoable command.
pub trait Operator {
    /// Stable identifier, e.g. `angles.add_angle`.
    fn id(&self) -> &'static str;

    /// Human-readable label.
    fn label(&self) -> &'static str;

    /// Run against `scene` with the current settings.
    fn execute(&self, scene: &mut Scene, settings: &AnglesSettings) -> Execution;
}

/// Register the `"Aligned"` orientation from the picked vertices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOrientationOperator {
    /// Swap the first and last picked vertex.
    pub inverse: bool,
}

impl Operator for SetOrientationOperator {
    fn id(&self) -> &'static str {
        "angles.set_orientation"
    }

    fn label(&self) -> &'static str {
        "Set Orientation"
    }

    fn execute(&self, scene: &mut Scene, _settings: &AnglesSettings) -> Execution {
        debug!(inverse = self.inverse, "executing {}", self.id());
        Execution::from_success(
            set_orientation(scene, self.inverse),
            "Please select exactly 3 vertices.",
        )
    }
}

/// Move the settings' `to_align` object onto the picked corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlignObjectOperator {
    /// Swap the first and last picked vertex.
    pub inverse: bool,
}

impl Operator for AlignObjectOperator {
    fn id(&self) -> &'static str {
        "angles.align_object"
    }

    fn label(&self) -> &'static str {
        "Align Object"
    }

    fn execute(&self, scene: &mut Scene, settings: &AnglesSettings) -> Execution {
        debug!(inverse = self.inverse, "executing {}", self.id());
        let ok = settings
            .to_align
            .is_some_and(|target| align_object(scene, target, self.inverse));
        Execution::from_success(
            ok,
            "Please select exactly 3 vertices and the object, you want to align.",
        )
    }
}

/// Build a joint from the settings' profile at the picked corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddAngleOperator;

impl Operator for AddAngleOperator {
    fn id(&self) -> &'static str {
        "angles.add_angle"
    }

    fn label(&self) -> &'static str {
        "Add Angle"
    }

    fn execute(&self, scene: &mut Scene, settings: &AnglesSettings) -> Execution {
        debug!("executing {}", self.id());
        let joint = settings
            .profile
            .and_then(|profile| add_angle(scene, profile));
        Execution::from_success(
            joint.is_some(),
            "Please select exactly 3 vertices and the mesh, you want to use as profile.",
        )
    }
}

/// All operators with default options.
pub fn registry() -> Vec<Box<dyn Operator>> {
    vec![
        Box::new(SetOrientationOperator::default()),
        Box::new(AlignObjectOperator::default()),
        Box::new(AddAngleOperator),
    ]
}

/// Look up an operator by id.
pub fn find(id: &str) -> Option<Box<dyn Operator>> {
    registry().into_iter().find(|op| op.id() == id)
}
