//! Error types for the facade.

use thiserror::Error;

use mitre_joint::JointError;
use mitre_scene::SceneError;

/// Errors from settings and export.
#[derive(Error, Debug)]
pub enum MitreError {
    /// Settings refer to something the scene does not hold.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The mesh to export has no faces.
    #[error("mesh '{0}' has no faces to export")]
    NothingToExport(String),

    /// Joint construction failed.
    #[error(transparent)]
    Joint(#[from] JointError),

    /// Scene lookup failed.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Writing output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, MitreError>;
