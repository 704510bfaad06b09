//! Per-face rule matching.
//!
//! Matching is independent and side-effect-free per face: a descriptor
//! either resolves to the first rule whose surface match and discriminators
//! all pass, or falls through to a diagnostic fallback label.

use facetag_math::{polar_angle_deg, radial_distance, sector_index, side_of, within, Axis, Side};
use facetag_descriptor::{FaceDescriptor, SurfaceDescriptor};

use crate::config::{Band, FeatureConfig, FeatureRule, NormalRule, SurfaceRule};

/// Alignment cutoff for "dominantly along an axis" tests.
const AXIS_ALIGN_MIN: f64 = 0.9;

/// Outcome of matching one face against the rule set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Match {
    /// The face matched the rule at this index.
    Rule {
        /// Index into `FeatureConfig::features`.
        rule: usize,
        /// Resolved sector suffix, if the rule has one.
        sector: Option<SectorMatch>,
    },
    /// No rule matched; carries the diagnostic fallback label.
    Unclassified(String),
}

/// A resolved angular-pattern suffix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SectorMatch {
    /// Displayed sector index (already offset by the rule's base).
    pub index: u32,
    /// Resolved side, if the rule asks for one.
    pub side: Option<Side>,
}

/// Match one face against the rules in declaration order.
pub(crate) fn match_face(face: &FaceDescriptor, config: &FeatureConfig) -> Match {
    for (idx, rule) in config.features.iter().enumerate() {
        if surface_matches(&rule.surface, face) && bands_match(rule, face) {
            let sector = rule.sector.map(|s| {
                let angle = polar_angle_deg(&face.centroid);
                let width = 360.0 / s.count as f64;
                let sector_idx = sector_index(angle, s.count, s.start_deg, s.window);
                let side = s.side.then(|| {
                    // Reference direction is the matched sector's own center.
                    let center_offset = if s.window { 0.5 } else { 0.0 };
                    let reference = s.start_deg + (sector_idx as f64 + center_offset) * width;
                    side_of(reference, &face.centroid)
                });
                SectorMatch {
                    index: sector_idx as u32 + s.base,
                    side,
                }
            });
            return Match::Rule { rule: idx, sector };
        }
    }
    Match::Unclassified(fallback_label(face))
}

fn surface_matches(rule: &SurfaceRule, face: &FaceDescriptor) -> bool {
    match (rule, &face.surface) {
        (SurfaceRule::Plane { normal: filter }, SurfaceDescriptor::Plane { normal }) => {
            match filter {
                None => true,
                Some(NormalRule::X) => Axis::dominant(normal, AXIS_ALIGN_MIN) == Some(Axis::X),
                Some(NormalRule::Y) => Axis::dominant(normal, AXIS_ALIGN_MIN) == Some(Axis::Y),
                Some(NormalRule::Z) => Axis::dominant(normal, AXIS_ALIGN_MIN) == Some(Axis::Z),
                Some(NormalRule::Lateral) => {
                    Axis::dominant(normal, AXIS_ALIGN_MIN) != Some(Axis::Z)
                }
            }
        }
        (
            SurfaceRule::Cylinder {
                radius: nominal,
                tolerance,
                axis: filter,
            },
            SurfaceDescriptor::Cylinder { radius, axis },
        ) => {
            within(*radius, *nominal, *tolerance)
                && filter.map_or(true, |want| {
                    Axis::dominant(axis, AXIS_ALIGN_MIN) == Some(want.axis())
                })
        }
        (SurfaceRule::Cone { apex_z }, SurfaceDescriptor::Cone { apex, .. }) => {
            apex_z.map_or(true, |band| band.contains(apex.z))
        }
        (
            SurfaceRule::Torus {
                minor_radius: nominal,
                tolerance,
            },
            SurfaceDescriptor::Torus { minor_radius, .. },
        ) => nominal.map_or(true, |r| within(*minor_radius, r, *tolerance)),
        (SurfaceRule::Revolution {}, SurfaceDescriptor::Revolution { .. }) => true,
        (SurfaceRule::Freeform {}, SurfaceDescriptor::Freeform) => true,
        _ => false,
    }
}

fn bands_match(rule: &FeatureRule, face: &FaceDescriptor) -> bool {
    let checks: [(&Option<Band>, f64); 5] = [
        (&rule.centroid_z, face.centroid.z),
        (&rule.centroid_radius, radial_distance(&face.centroid)),
        (&rule.centroid_x, face.centroid.x),
        (&rule.centroid_y, face.centroid.y),
        (&rule.span_z, face.bbox.span(Axis::Z)),
    ];
    checks
        .iter()
        .all(|(band, value)| band.map_or(true, |b| b.contains(*value)))
}

/// Diagnostic label for a face no rule claimed.
///
/// Encodes the surface kind and its key parameter so the miss can be traced
/// back to geometry without re-querying the kernel.
pub(crate) fn fallback_label(face: &FaceDescriptor) -> String {
    match &face.surface {
        SurfaceDescriptor::Plane { .. } => {
            format!("unclassified.plane_z{:.1}", face.centroid.z)
        }
        SurfaceDescriptor::Cylinder { radius, .. } => {
            format!("unclassified.cylinder_r{radius:.2}")
        }
        SurfaceDescriptor::Cone { apex, .. } => {
            format!("unclassified.cone_z{:.1}", apex.z)
        }
        SurfaceDescriptor::Torus { minor_radius, .. } => {
            format!("unclassified.torus_r{minor_radius:.2}")
        }
        SurfaceDescriptor::Revolution { .. } => {
            format!("unclassified.revolution_z{:.1}", face.centroid.z)
        }
        SurfaceDescriptor::Freeform => {
            format!("unclassified.freeform_z{:.1}", face.centroid.z)
        }
        SurfaceDescriptor::Other { kind } => format!("unclassified.other_{kind}"),
    }
}
