#![warn(missing_docs)]

//! Face descriptor extraction for the facetag labeling pipeline.
//!
//! Defines the immutable geometric descriptor recorded for each face of a
//! B-rep solid, the [`SolidFaces`] seam through which a modeling kernel is
//! queried, and the extractor that walks a solid's faces in kernel traversal
//! order. The extractor is a pure read: every face yields exactly one
//! descriptor, including faces the classifier will later fail to resolve.

use std::fmt;

use facetag_math::{Aabb, Dir3, Point3};
use thiserror::Error;

// =============================================================================
// Surface descriptors
// =============================================================================

/// The kind of a face's underlying surface (for match-based dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Planar surface.
    Plane,
    /// Cylindrical surface.
    Cylinder,
    /// Conical surface.
    Cone,
    /// Toroidal surface.
    Torus,
    /// General surface of revolution.
    Revolution,
    /// Freeform (B-spline / NURBS) surface.
    Freeform,
    /// A surface kind this pipeline does not model.
    Other,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceKind::Plane => "plane",
            SurfaceKind::Cylinder => "cylinder",
            SurfaceKind::Cone => "cone",
            SurfaceKind::Torus => "torus",
            SurfaceKind::Revolution => "revolution",
            SurfaceKind::Freeform => "freeform",
            SurfaceKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Kind-specific surface parameters for one face.
///
/// Each variant carries only the parameters the classifier can match on.
/// Unknown kernel surface kinds map to [`SurfaceDescriptor::Other`] so they
/// fail loudly (as explicit unclassified labels) instead of silently.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceDescriptor {
    /// Planar face.
    Plane {
        /// Unit normal of the plane.
        normal: Dir3,
    },
    /// Cylindrical face.
    Cylinder {
        /// Cylinder radius.
        radius: f64,
        /// Unit direction of the cylinder axis.
        axis: Dir3,
    },
    /// Conical face.
    Cone {
        /// Half-angle of the cone in radians.
        half_angle: f64,
        /// Unit direction of the cone axis.
        axis: Dir3,
        /// Apex (tip) of the cone.
        apex: Point3,
    },
    /// Toroidal face.
    Torus {
        /// Major radius: ring center to tube center.
        major_radius: f64,
        /// Minor radius: tube radius.
        minor_radius: f64,
        /// Unit direction of the torus axis.
        axis: Dir3,
    },
    /// General surface of revolution (non-analytic profile).
    Revolution {
        /// Unit direction of the revolution axis.
        axis: Dir3,
    },
    /// Freeform surface (B-spline / NURBS), typically a loft or fillet artifact.
    Freeform,
    /// A kind the pipeline does not model.
    Other {
        /// Kernel-reported kind name, for diagnostics.
        kind: String,
    },
}

impl SurfaceDescriptor {
    /// The kind tag of this descriptor.
    pub fn kind(&self) -> SurfaceKind {
        match self {
            SurfaceDescriptor::Plane { .. } => SurfaceKind::Plane,
            SurfaceDescriptor::Cylinder { .. } => SurfaceKind::Cylinder,
            SurfaceDescriptor::Cone { .. } => SurfaceKind::Cone,
            SurfaceDescriptor::Torus { .. } => SurfaceKind::Torus,
            SurfaceDescriptor::Revolution { .. } => SurfaceKind::Revolution,
            SurfaceDescriptor::Freeform => SurfaceKind::Freeform,
            SurfaceDescriptor::Other { .. } => SurfaceKind::Other,
        }
    }
}

/// The full immutable descriptor extracted for one face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDescriptor {
    /// Position of the face in kernel traversal order.
    pub index: usize,
    /// Kind-specific surface parameters.
    pub surface: SurfaceDescriptor,
    /// Area centroid of the face.
    pub centroid: Point3,
    /// Axis-aligned bounding box of the face.
    pub bbox: Aabb,
    /// Surface area of the face.
    pub area: f64,
}

// =============================================================================
// Kernel seam
// =============================================================================

/// Errors raised while reading faces out of a solid.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The solid handle is invalid or the kernel cannot enumerate its faces.
    #[error("invalid solid: {0}")]
    InvalidSolid(String),

    /// A per-face geometry query failed.
    #[error("face {index}: {message}")]
    Face {
        /// Index of the face in traversal order.
        index: usize,
        /// Kernel-reported failure.
        message: String,
    },
}

/// Ordered face enumeration of a built solid.
///
/// This is the seam to the external modeling kernel: an adapter implements
/// these queries against the kernel's live face list, in the kernel's own
/// traversal order. The pipeline never calls back into modeling operations.
pub trait SolidFaces {
    /// Number of faces in traversal order.
    fn face_count(&self) -> Result<usize, ExtractError>;

    /// Surface kind and parameters of the face at `index`.
    fn surface(&self, index: usize) -> Result<SurfaceDescriptor, ExtractError>;

    /// Area centroid of the face at `index`.
    fn centroid(&self, index: usize) -> Result<Point3, ExtractError>;

    /// Axis-aligned bounding box of the face at `index`.
    fn bounding_box(&self, index: usize) -> Result<Aabb, ExtractError>;

    /// Surface area of the face at `index`.
    fn area(&self, index: usize) -> Result<f64, ExtractError>;
}

/// One face's worth of kernel query results, owned.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Surface kind and parameters.
    pub surface: SurfaceDescriptor,
    /// Area centroid.
    pub centroid: Point3,
    /// Axis-aligned bounding box.
    pub bbox: Aabb,
    /// Surface area.
    pub area: f64,
}

/// An owned, in-memory [`SolidFaces`] implementation.
///
/// Kernel adapters that materialize their query results up front can hand the
/// pipeline a `FaceTable`; it also serves as the test double throughout the
/// workspace.
#[derive(Debug, Clone, Default)]
pub struct FaceTable {
    faces: Vec<FaceData>,
}

impl FaceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a face, returning its traversal index.
    pub fn push(&mut self, face: FaceData) -> usize {
        let idx = self.faces.len();
        self.faces.push(face);
        idx
    }

    /// Number of faces in the table.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether the table has no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn get(&self, index: usize) -> Result<&FaceData, ExtractError> {
        self.faces.get(index).ok_or_else(|| ExtractError::Face {
            index,
            message: format!("out of range (table has {} faces)", self.faces.len()),
        })
    }
}

impl FromIterator<FaceData> for FaceTable {
    fn from_iter<T: IntoIterator<Item = FaceData>>(iter: T) -> Self {
        Self {
            faces: iter.into_iter().collect(),
        }
    }
}

impl SolidFaces for FaceTable {
    fn face_count(&self) -> Result<usize, ExtractError> {
        Ok(self.faces.len())
    }

    fn surface(&self, index: usize) -> Result<SurfaceDescriptor, ExtractError> {
        Ok(self.get(index)?.surface.clone())
    }

    fn centroid(&self, index: usize) -> Result<Point3, ExtractError> {
        Ok(self.get(index)?.centroid)
    }

    fn bounding_box(&self, index: usize) -> Result<Aabb, ExtractError> {
        Ok(self.get(index)?.bbox)
    }

    fn area(&self, index: usize) -> Result<f64, ExtractError> {
        Ok(self.get(index)?.area)
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract one descriptor per face, in kernel traversal order.
///
/// Pure read, no mutation, no filtering. Any kernel query failure aborts the
/// whole extraction; partial descriptor lists are never returned.
pub fn extract_descriptors(solid: &dyn SolidFaces) -> Result<Vec<FaceDescriptor>, ExtractError> {
    let count = solid.face_count()?;
    let mut descriptors = Vec::with_capacity(count);
    for index in 0..count {
        descriptors.push(FaceDescriptor {
            index,
            surface: solid.surface(index)?,
            centroid: solid.centroid(index)?,
            bbox: solid.bounding_box(index)?,
            area: solid.area(index)?,
        });
    }
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetag_math::Vec3;

    fn planar_face(z: f64) -> FaceData {
        FaceData {
            surface: SurfaceDescriptor::Plane {
                normal: Dir3::new_normalize(Vec3::z()),
            },
            centroid: Point3::new(0.0, 0.0, z),
            bbox: Aabb::from_corners(Point3::new(-5.0, -5.0, z), Point3::new(5.0, 5.0, z)),
            area: 100.0,
        }
    }

    #[test]
    fn test_extract_preserves_order_and_count() {
        let table: FaceTable = (0..4).map(|i| planar_face(i as f64 * 10.0)).collect();
        let descriptors = extract_descriptors(&table).unwrap();
        assert_eq!(descriptors.len(), 4);
        for (i, d) in descriptors.iter().enumerate() {
            assert_eq!(d.index, i);
            assert_eq!(d.centroid.z, i as f64 * 10.0);
        }
    }

    #[test]
    fn test_extract_empty_solid() {
        let table = FaceTable::new();
        let descriptors = extract_descriptors(&table).unwrap();
        assert!(descriptors.is_empty());
    }

    #[test]
    fn test_face_table_out_of_range() {
        let table = FaceTable::new();
        let err = table.surface(3).unwrap_err();
        assert!(matches!(err, ExtractError::Face { index: 3, .. }));
    }

    #[test]
    fn test_surface_kind_tags() {
        let cyl = SurfaceDescriptor::Cylinder {
            radius: 2.5,
            axis: Dir3::new_normalize(Vec3::z()),
        };
        assert_eq!(cyl.kind(), SurfaceKind::Cylinder);
        assert_eq!(cyl.kind().to_string(), "cylinder");

        let other = SurfaceDescriptor::Other {
            kind: "offset_surface".into(),
        };
        assert_eq!(other.kind(), SurfaceKind::Other);
    }
}
