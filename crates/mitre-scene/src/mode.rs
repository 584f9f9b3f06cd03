//! Interaction modes and the guard that restores them.

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::Scene;

/// Interaction mode of the scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Whole objects are selected and transformed.
    #[default]
    Object,
    /// The active mesh's vertices are edited.
    Edit,
}

/// Switches the scene into a mode and restores the previous mode on drop.
///
/// Dereferences to the scene, so work done through the guard happens in the
/// requested mode and every exit path (including `?`) restores the original.
pub struct ModeGuard<'a> {
    scene: &'a mut Scene,
    previous: Mode,
}

impl<'a> ModeGuard<'a> {
    pub(crate) fn new(scene: &'a mut Scene, mode: Mode) -> Self {
        let previous = scene.mode;
        scene.mode = mode;
        trace!(?previous, ?mode, "entered mode");
        Self { scene, previous }
    }

    /// The mode that will be restored.
    pub fn previous(&self) -> Mode {
        self.previous
    }
}

impl Deref for ModeGuard<'_> {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        self.scene
    }
}

impl DerefMut for ModeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Scene {
        self.scene
    }
}

impl Drop for ModeGuard<'_> {
    fn drop(&mut self) {
        self.scene.mode = self.previous;
    }
}
