#![warn(missing_docs)]

//! Semantic face labeling for B-rep solids, persisted into STEP files.
//!
//! facetag turns an anonymous CAD export into a labeled reference part: each
//! face of the built solid is classified against a per-part-family feature
//! configuration, and the resulting labels are written into the name fields
//! of the file's face records. Nothing else in the file changes, byte for
//! byte.
//!
//! The pipeline runs in fixed stages: Extract → Classify → Parse →
//! Correlate → Inject → Write. Every stage either completes or fails the
//! whole run; the file is only written after the rewritten text is fully
//! materialized, so any fatal condition leaves it untouched.
//!
//! # Example
//!
//! ```no_run
//! use facetag::classify_and_label;
//! use facetag::facetag_classify::FeatureConfig;
//! use facetag::facetag_descriptor::FaceTable;
//!
//! # fn kernel_faces() -> FaceTable { FaceTable::new() }
//! let solid = kernel_faces(); // adapter over the modeling kernel
//! let config = FeatureConfig::from_toml_str(r#"
//!     [[feature]]
//!     label = "top"
//!     surface = { type = "plane", normal = "z" }
//!     centroid_z = { at = 50.0, tolerance = 0.2 }
//! "#).unwrap();
//! let report = classify_and_label(&solid, "disc.step", &config).unwrap();
//! println!("{} faces labeled, {} unclassified", report.labels.len(), report.unclassified);
//! ```

pub use facetag_classify;
pub use facetag_descriptor;
pub use facetag_math;
pub use facetag_step;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use facetag_classify::{classify, FeatureConfig};
use facetag_descriptor::{extract_descriptors, ExtractError, SolidFaces};
use facetag_step::{inject_labels, EntityGraph, StepError};

/// Errors that abort a labeling run.
///
/// All of them are fatal before any file mutation; the write is
/// all-or-nothing.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading faces out of the solid failed.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// Parsing the file or correlating labels with its face order failed.
    #[error(transparent)]
    Step(#[from] StepError),

    /// Reading or writing the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of one labeling run.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelReport {
    /// One label per face, in kernel traversal order.
    pub labels: Vec<String>,
    /// How many labels are `unclassified.*` fallbacks. Not an error; the
    /// caller decides whether unresolved faces fail the build.
    pub unclassified: usize,
}

/// Extract and classify the solid's faces without touching any file.
pub fn classify_solid(
    solid: &dyn SolidFaces,
    config: &FeatureConfig,
) -> Result<LabelReport, PipelineError> {
    let descriptors = extract_descriptors(solid)?;
    info!(faces = descriptors.len(), "extracted face descriptors");

    let classification = classify(&descriptors, config);
    for (descriptor, label) in descriptors.iter().zip(&classification.labels) {
        debug!(
            face = descriptor.index,
            kind = %descriptor.surface.kind(),
            %label,
            "classified face"
        );
    }
    if classification.unclassified > 0 {
        info!(
            count = classification.unclassified,
            "faces left unclassified"
        );
    }

    Ok(LabelReport {
        labels: classification.labels,
        unclassified: classification.unclassified,
    })
}

/// Classify the solid's faces and write the labels into its STEP file.
///
/// The solid must be the freshly built in-memory model the file was exported
/// from, never a re-imported copy, since import/tessellation round-trips
/// can split or reorder faces. The two sides meet only through face count
/// and ordering: label *i* goes to the *i*-th face reference of the file's
/// shell record(s).
///
/// On success the file is rewritten in place with every byte outside the
/// face-name fields preserved. On any error the file is left byte-identical
/// to its pre-call state.
pub fn classify_and_label(
    solid: &dyn SolidFaces,
    path: impl AsRef<Path>,
    config: &FeatureConfig,
) -> Result<LabelReport, PipelineError> {
    let report = classify_solid(solid, config)?;

    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let graph = EntityGraph::parse(&text)?;
    debug!(
        records = graph.records().len(),
        shell_faces = graph.shell_faces().len(),
        "parsed entity graph"
    );

    let labeled = inject_labels(&text, &graph, &report.labels)?;
    std::fs::write(path, labeled)?;
    info!(
        path = %path.display(),
        labels = report.labels.len(),
        unclassified = report.unclassified,
        "wrote face labels"
    );

    Ok(report)
}
