use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use ose_piping_fittings::{Feature, Node};
use ose_piping_io::{DEFAULT_TESSELLATION_TOLERANCE, ExportFormat, export_solid, triangulate_solid};
use ose_piping_topology::{Point3, SolidBuilder};

fn temp_path(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_millis(),
        Err(_) => 0,
    };
    path.push(format!("ose_piping_{stamp}_{file_name}"));
    path
}

#[test]
fn step_export_writes_a_header() -> Result<()> {
    let solid = SolidBuilder::cylinder_z(Point3::new(0.0, 0.0, 0.0), 15.0, 100.0)?;
    let path = temp_path("socket.step");

    assert_eq!(export_solid(&solid, &path, DEFAULT_TESSELLATION_TOLERANCE)?, ExportFormat::Step);

    let text = fs::read_to_string(&path)?;
    assert!(text.starts_with("ISO-10303-21"));
    assert!(text.contains("ose-piping"));

    let _ = fs::remove_file(&path);
    Ok(())
}

#[test]
fn obj_export_creates_missing_directories() -> Result<()> {
    let solid = SolidBuilder::box_solid(10.0, 20.0, 30.0)?;
    let dir = temp_path("nested");
    let path = dir.join("box.obj");

    assert_eq!(export_solid(&solid, &path, DEFAULT_TESSELLATION_TOLERANCE)?, ExportFormat::Obj);
    assert!(fs::metadata(&path)?.len() > 0);

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn fitting_primitives_triangulate() -> Result<()> {
    // Every leaf of a fitting tree is a primitive that must mesh on its own.
    let tree = Feature::cut(
        "Socket",
        Feature::cylinder("Outer", 15.0, 40.0),
        Feature::cone("Inner", 10.0, 5.0, 40.0),
    );
    for part in tree.nested() {
        if let Node::Primitive(primitive) = part.node() {
            let solid = SolidBuilder::primitive(primitive)?;
            let mesh = triangulate_solid(&solid, DEFAULT_TESSELLATION_TOLERANCE);
            assert!(!mesh.positions().is_empty(), "{} produced no mesh", part.name());
        }
    }
    Ok(())
}
