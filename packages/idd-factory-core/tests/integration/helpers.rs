//! Shared fixtures for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use idd_factory_core::config::RegistryConfig;
use idd_factory_core::source::{load_sources, SourceLocation};
use idd_factory_core::ObjectFactoryRegistry;

pub const ENERGYPLUS_IDD: &str = "\
!IDD_Version 23.2.0
!IDD_BUILD 7636e6b3e9

\\group Simulation Parameters

Version,
      \\unique-object
      \\format singleLine
  A1 ; \\field Version Identifier
      \\required-field
      \\default 23.2

Building,
       \\unique-object
       \\required-object
       \\min-fields 2
  A1 , \\field Name
       \\required-field
       \\default NONE
  N1 ; \\field North Axis
       \\units deg
       \\default 0.0

\\group Thermal Zones and Surfaces

Zone,
       \\memo Defines a thermal zone of the building.
  A1 , \\field Name
       \\required-field
  N1 ; \\field Direction of Relative North
       \\units deg

\\group HVAC Design Objects

Sizing:Zone,
  A1 ; \\field Zone or ZoneList Name
";

pub const OPENSTUDIO_IDD: &str = "\
!IDD_Version 3.7.0
! **************************************************************************
! OpenStudio Models
! **************************************************************************

\\include-file Energy+.idd
\\remove-object Version
\\remove-object Building
\\remove-object Sizing:Zone
\\remove-object Output:SQLite

\\group OpenStudio Core

OS:Version,
       \\unique-object
       \\format singleLine
  A1, \\field Handle
       \\type handle
       \\required-field
  A2; \\field Version Identifier
       \\default 3.7.0

\\group OpenStudio Building

OS:Building,
       \\unique-object
       \\required-object
  A1, \\field Handle
       \\type handle
  A2; \\field Name

\\group OpenStudio HVAC

OS:Fan:ConstantVolume,
       \\min-fields 2
  A1, \\field Handle
       \\type handle
  N1; \\field Fan Total Efficiency
       \\default 0.7
";

/// Writes the fixture IDD files into `dir` and returns their locations.
pub fn write_sources(dir: &Path) -> Vec<SourceLocation> {
    let eplus = dir.join("Energy+.idd");
    let os = dir.join("OpenStudio.idd");
    fs::write(&eplus, ENERGYPLUS_IDD).unwrap();
    fs::write(&os, OPENSTUDIO_IDD).unwrap();
    vec![
        SourceLocation {
            name: "Energy+".to_string(),
            path: eplus,
        },
        SourceLocation {
            name: "OpenStudio".to_string(),
            path: os,
        },
    ]
}

pub fn config(snapshot_dir: PathBuf) -> RegistryConfig {
    RegistryConfig {
        snapshot_dir,
        version_objects: vec![
            ("Energy+".to_string(), "Version".to_string()),
            ("OpenStudio".to_string(), "OS:Version".to_string()),
        ],
        ..Default::default()
    }
}

/// Builds the fixture registry, with snapshots rooted at `<dir>/versions`.
pub fn build_registry(dir: &Path) -> ObjectFactoryRegistry {
    let sources = load_sources(&write_sources(dir)).unwrap();
    ObjectFactoryRegistry::new(sources, config(dir.join("versions"))).unwrap()
}
