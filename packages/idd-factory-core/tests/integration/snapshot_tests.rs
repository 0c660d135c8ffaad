//! Historical snapshot retrieval.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use ntest::timeout;
use tempfile::tempdir;

use idd_factory_core::{SchemaFile, SchemaFileType, SchemaObjectType, VersionString, VersionedSnapshotLoader};

use super::helpers::build_registry;

const OLD_OPENSTUDIO: &str = "\
!IDD_Version 3.5.1
! OpenStudio Models

\\group OpenStudio Core

OS:Version,
       \\unique-object
  A1, \\field Handle
  A2; \\field Version Identifier

\\group OpenStudio HVAC

OS:Fan:ConstantVolume,
  A1, \\field Handle
  N1; \\field Fan Efficiency
";

fn write_snapshot(root: &Path, version_dir: &str, source: &str, text: &str) {
    let dir = root.join(version_dir);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.idd", source)), text).unwrap();
}

fn v(s: &str) -> VersionString {
    VersionString::parse(s).unwrap()
}

#[test]
fn test_old_version_served_from_disk() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    write_snapshot(&temp_dir.path().join("versions"), "3_5_1", "OpenStudio", OLD_OPENSTUDIO);
    let registry = build_registry(temp_dir.path());
    let os = SchemaFileType::source("OpenStudio");

    let old = registry.get_idd_file_at_version(&os, &v("3.5.1")).unwrap();
    assert_eq!(old.file_type(), &SchemaFileType::UserCustom);
    assert_eq!(old.version(), "3.5.1");
    assert_eq!(old.len(), 3);
    let fan = old
        .get_object(&SchemaObjectType::from_display("OS:Fan:ConstantVolume"))
        .unwrap();
    assert_eq!(fan.fields()[1].name, "Fan Efficiency");

    let live = registry.get_object_by_name("OS:Fan:ConstantVolume").unwrap();
    assert_eq!(live.fields()[1].name, "Fan Total Efficiency");
    Ok(())
}

#[test]
fn test_energyplus_family_has_no_history() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    write_snapshot(&temp_dir.path().join("versions"), "22_1_0", "Energy+", "!IDD_Version 22.1.0\n");
    let registry = build_registry(temp_dir.path());
    let eplus = SchemaFileType::source("Energy+");

    assert!(registry.get_idd_file_at_version(&eplus, &v("22.1.0")).is_none());
    assert!(registry.snapshot_loader(&eplus).is_none());
    assert!(registry.get_idd_file_at_version(&eplus, &v("23.2")).is_some());
    Ok(())
}

#[test]
fn test_missing_patch_maps_to_zero() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    write_snapshot(
        &temp_dir.path().join("versions"),
        "3_0_0",
        "OpenStudio",
        "!IDD_Version 3.0.0\n\nOS:Version;\n",
    );
    let registry = build_registry(temp_dir.path());
    let os = SchemaFileType::source("OpenStudio");

    let old = registry.get_idd_file_at_version(&os, &v("3.0")).unwrap();
    assert_eq!(old.version(), "3.0.0");
    let loader = registry.snapshot_loader(&os).unwrap();
    assert_eq!(loader.cached_versions(), vec![v("3.0.0")]);
    Ok(())
}

#[test]
fn test_exported_file_is_a_loadable_snapshot() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let registry = build_registry(temp_dir.path());
    let os = SchemaFileType::source("OpenStudio");

    let archive = temp_dir.path().join("archive");
    write_snapshot(&archive, "3_7_0", "OpenStudio", &registry.get_idd_file(&os).to_idd_text());

    let loader = VersionedSnapshotLoader::new(&archive, "OpenStudio");
    let loaded = loader.load(&v("3.7.0")).unwrap();
    let names = |file: &SchemaFile| {
        file.objects()
            .iter()
            .map(|o| o.name().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&loaded), names(&registry.get_idd_file(&os)));
    Ok(())
}

#[timeout(10000)]
#[test]
fn test_concurrent_snapshot_loads_share_cache() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().to_path_buf();
    for (dir, version) in [("3_1_0", "3.1.0"), ("3_2_0", "3.2.0"), ("3_3_0", "3.3.0")] {
        write_snapshot(
            &root,
            dir,
            "OpenStudio",
            &format!("!IDD_Version {}\n\nOS:Version;\n", version),
        );
    }
    let loader = Arc::new(VersionedSnapshotLoader::new(&root, "OpenStudio"));

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let loader = Arc::clone(&loader);
            thread::spawn(move || {
                let version = ["3.1.0", "3.2.0", "3.3.0"][i % 3];
                loader.load(&v(version)).unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(loader.cached_versions(), vec![v("3.1"), v("3.2"), v("3.3")]);
    let first = loader.load(&v("3.2.0")).unwrap();
    let second = loader.load(&v("3.2.0")).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}
