//! Concurrent first use of a shared registry.

use std::sync::{Arc, Barrier};
use std::thread;

use ntest::timeout;
use tempfile::tempdir;

use idd_factory_core::source::load_sources;
use idd_factory_core::{LazyRegistry, RegistryState, SchemaFileType};

use super::helpers::{config, write_sources};

#[timeout(10000)]
#[test]
fn test_lazy_registry_shared_across_threads() {
    let temp_dir = tempdir().unwrap();
    let sources = load_sources(&write_sources(temp_dir.path())).unwrap();
    let lazy = Arc::new(LazyRegistry::from_sources(
        sources,
        config(temp_dir.path().join("versions")),
    ));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let lazy = Arc::clone(&lazy);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let registry = lazy.instance().unwrap();
                let name = ["Zone", "OS:Version", "OS:Building", "Building"][i % 4];
                let object = registry.get_object_by_name(name).unwrap();
                (registry, object)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(lazy.build_count(), 1);
    assert_eq!(lazy.state(), RegistryState::Ready);
    let registry = &results[0].0;
    assert!(results.iter().all(|(r, _)| Arc::ptr_eq(r, registry)));
    for (i, (_, object)) in results.iter().enumerate() {
        assert!(Arc::ptr_eq(object, &results[i % 4].1));
    }
    for object_type in registry.object_types() {
        assert!(registry.construction_count(object_type) <= 1);
    }
}

#[timeout(10000)]
#[test]
fn test_concurrent_materialization_constructs_each_type_once() {
    let temp_dir = tempdir().unwrap();
    let sources = load_sources(&write_sources(temp_dir.path())).unwrap();
    let lazy = LazyRegistry::from_sources(sources, config(temp_dir.path().join("versions")));
    let registry = lazy.instance().unwrap();
    let file_types = registry.file_types();

    thread::scope(|scope| {
        for file_type in &file_types {
            for _ in 0..4 {
                let registry = &registry;
                scope.spawn(move || registry.get_idd_file(file_type));
            }
        }
    });

    for object_type in registry.object_types() {
        let expected = usize::from(registry.is_in_file(object_type, &SchemaFileType::WholeRegistry));
        assert_eq!(registry.construction_count(object_type), expected, "{}", object_type);
    }
}
