#![warn(missing_docs)]

//! Tolerance-based face classification for the facetag labeling pipeline.
//!
//! [`classify`] maps a sequence of face descriptors to semantic labels using
//! a per-part-family [`FeatureConfig`]: dispatch on surface kind, tolerance
//! matching of nominal parameters, centroid/extent disambiguation, angular
//! sector indexing, and side resolution. Every descriptor yields exactly one
//! label, in input order; faces no rule claims receive an explicit
//! `unclassified.*` label rather than being dropped or merged.

mod config;
mod matcher;

pub use config::{
    AxisRule, Band, ConfigError, FeatureConfig, FeatureRule, NormalRule, SectorRule, SurfaceRule,
};

use rayon::prelude::*;

use facetag_descriptor::FaceDescriptor;

use crate::matcher::{match_face, Match};

/// Result of classifying a descriptor sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// One label per input descriptor, same order.
    pub labels: Vec<String>,
    /// How many of those labels are `unclassified.*` fallbacks.
    pub unclassified: usize,
}

/// Classify each face descriptor against the feature configuration.
///
/// Per-face matching is independent and runs in parallel; results are
/// reassembled in original index order before suffixes are assigned, so the
/// output order is always the input order. Occurrence counters (`numbered`
/// rules) are explicit accumulator state threaded through the sequential
/// assembly pass, so numbering follows traversal order deterministically.
///
/// The configuration is assumed validated (see [`FeatureConfig::validate`]).
pub fn classify(faces: &[FaceDescriptor], config: &FeatureConfig) -> Classification {
    let matches: Vec<Match> = faces
        .par_iter()
        .map(|face| match_face(face, config))
        .collect();

    let mut counters = vec![0u32; config.features.len()];
    let mut labels = Vec::with_capacity(matches.len());
    let mut unclassified = 0;

    for m in matches {
        match m {
            Match::Rule { rule, sector } => {
                let feature = &config.features[rule];
                let mut label = feature.label.clone();
                if let Some(sector) = sector {
                    label.push_str(&format!("_{:02}", sector.index));
                    if let Some(side) = sector.side {
                        label.push('.');
                        label.push_str(side.as_str());
                    }
                } else if feature.numbered {
                    counters[rule] += 1;
                    label.push_str(&format!("_{:02}", counters[rule]));
                }
                labels.push(label);
            }
            Match::Unclassified(label) => {
                unclassified += 1;
                labels.push(label);
            }
        }
    }

    Classification {
        labels,
        unclassified,
    }
}
