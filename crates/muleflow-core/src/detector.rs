//! Detector metadata and the base detector trait.
//!
//! Every pattern detector in the pipeline carries a `DetectorMetadata`
//! describing what it is and which stage of the pipeline it belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detector execution stage.
///
/// Determines which shared graph index a detector walks:
/// - `Structural`: traverses the deduplicated adjacency (cycles, chains)
/// - `Temporal`: scans per-account time-ordered edge sequences (windows)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectorStage {
    /// Structural detectors walk forward/reverse adjacency.
    Structural,

    /// Temporal detectors slide windows over timestamp-sorted edges.
    Temporal,
}

impl DetectorStage {
    /// Returns true if this is a structural detector.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, DetectorStage::Structural)
    }

    /// Returns true if this is a temporal detector.
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(self, DetectorStage::Temporal)
    }

    /// Returns the stage name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DetectorStage::Structural => "structural",
            DetectorStage::Temporal => "temporal",
        }
    }
}

impl fmt::Display for DetectorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detector metadata.
///
/// Contains the identity and description of a pipeline detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorMetadata {
    /// Unique detector identifier (e.g., "detect/cycles").
    pub id: String,

    /// Pipeline stage.
    pub stage: DetectorStage,

    /// Human-readable description.
    pub description: String,

    /// Version of the detector implementation.
    pub version: u32,
}

impl DetectorMetadata {
    /// Create metadata for a structural detector.
    #[must_use]
    pub fn structural(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stage: DetectorStage::Structural,
            description: String::new(),
            version: 1,
        }
    }

    /// Create metadata for a temporal detector.
    #[must_use]
    pub fn temporal(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stage: DetectorStage::Temporal,
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// Base trait for all pattern detectors.
pub trait Detector: Send + Sync + fmt::Debug {
    /// Returns the detector metadata.
    fn metadata(&self) -> &DetectorMetadata;

    /// Returns the detector ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }

    /// Returns the detector stage.
    fn stage(&self) -> DetectorStage {
        self.metadata().stage
    }
}
