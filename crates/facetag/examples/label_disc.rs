//! Label a 5-spoke disc export: basic facetag usage.
//!
//! Builds the face table a kernel adapter would produce for a simple spoked
//! disc, writes a matching STEP skeleton, and labels it in place.

use facetag::{classify_and_label, facetag_classify::FeatureConfig};
use facetag_descriptor::{FaceData, FaceTable, SurfaceDescriptor};
use facetag_math::{Aabb, Dir3, Point3, Vec3};

const DISC_CONFIG: &str = r#"
[[feature]]
label = "bottom"
surface = { type = "plane", normal = "z" }
centroid_z = { at = 0.0, tolerance = 0.1 }

[[feature]]
label = "top"
surface = { type = "plane", normal = "z" }
centroid_z = { at = 20.0, tolerance = 0.1 }

[[feature]]
label = "bore"
surface = { type = "cylinder", radius = 2.5, tolerance = 0.1 }

[[feature]]
label = "rim"
surface = { type = "cylinder", radius = 100.0, tolerance = 0.1 }
sector = { count = 5 }

[[feature]]
label = "hub"
surface = { type = "cylinder", radius = 15.0, tolerance = 0.1 }
sector = { count = 5, window = true }

[[feature]]
label = "spoke"
surface = { type = "plane", normal = "lateral" }
sector = { count = 5, side = true }
"#;

fn z_dir() -> Dir3 {
    Dir3::new_normalize(Vec3::z())
}

fn face(surface: SurfaceDescriptor, centroid: Point3) -> FaceData {
    FaceData {
        surface,
        centroid,
        bbox: Aabb::from_corners(centroid, centroid),
        area: 1.0,
    }
}

/// The disc's faces in kernel traversal order: top, bottom, bore, one rim
/// arc and two spoke flanks per spoke, one hub arc per window.
fn disc_faces() -> FaceTable {
    let mut table = FaceTable::new();
    table.push(face(
        SurfaceDescriptor::Plane { normal: z_dir() },
        Point3::new(0.0, 0.0, 20.0),
    ));
    table.push(face(
        SurfaceDescriptor::Plane { normal: z_dir() },
        Point3::new(0.0, 0.0, 0.0),
    ));
    table.push(face(
        SurfaceDescriptor::Cylinder {
            radius: 2.5,
            axis: z_dir(),
        },
        Point3::new(2.5, 0.0, 10.0),
    ));
    for i in 0..5 {
        let spoke = (i as f64 * 72.0).to_radians();
        table.push(face(
            SurfaceDescriptor::Cylinder {
                radius: 100.0,
                axis: z_dir(),
            },
            Point3::new(100.0 * spoke.cos(), 100.0 * spoke.sin(), 10.0),
        ));
        for flank in [5.0, -5.0] {
            let centroid = Point3::new(
                60.0 * spoke.cos() - flank * spoke.sin(),
                60.0 * spoke.sin() + flank * spoke.cos(),
                10.0,
            );
            let outward = Vec3::new(-centroid.y, centroid.x, 0.0) * flank.signum();
            table.push(face(
                SurfaceDescriptor::Plane {
                    normal: Dir3::new_normalize(outward),
                },
                centroid,
            ));
        }
        let window = (i as f64 * 72.0 + 36.0).to_radians();
        table.push(face(
            SurfaceDescriptor::Cylinder {
                radius: 15.0,
                axis: z_dir(),
            },
            Point3::new(15.0 * window.cos(), 15.0 * window.sin(), 10.0),
        ));
    }
    table
}

/// A STEP skeleton whose shell references one face record per table entry.
fn disc_step(face_count: usize) -> String {
    let mut text = String::from(
        "ISO-10303-21;\nHEADER;\nFILE_DESCRIPTION((''),'2;1');\nENDSEC;\nDATA;\n",
    );
    let ids: Vec<String> = (0..face_count).map(|i| format!("#{}", 100 + i)).collect();
    text.push_str(&format!("#1 = CLOSED_SHELL('',({}));\n", ids.join(",")));
    for (i, id) in ids.iter().enumerate() {
        text.push_str(&format!(
            "{id} = ADVANCED_FACE('',(#{}),#{},.T.);\n",
            300 + i,
            400 + i
        ));
    }
    text.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
    text
}

fn main() {
    tracing_subscriber::fmt().init();

    let solid = disc_faces();
    let config = FeatureConfig::from_toml_str(DISC_CONFIG).expect("valid config");

    let mut path = std::env::temp_dir();
    path.push("facetag_disc.step");
    std::fs::write(&path, disc_step(solid.len())).expect("write skeleton");

    let report = classify_and_label(&solid, &path, &config).expect("labeling failed");

    println!(
        "{} faces labeled ({} unclassified) -> {}",
        report.labels.len(),
        report.unclassified,
        path.display()
    );
    for label in &report.labels {
        println!("  {label}");
    }
}
