//! 加载器端到端测试

mod common;

use common::{base, image_for, write_raw, write_unit, CountingFileSystem, HalfReadFileSystem};
use shade_core::{Host, HostError, ImageHost, LoadError, NotFoundCause, Origin, UnitLoader};
use shade_vfs::VfsError;
use std::sync::Arc;

#[test]
fn test_found_under_second_base_is_cached() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let path = write_unit(b.path(), "pkg.X");

    let vfs = CountingFileSystem::new();
    let loader = UnitLoader::new([base(a.path()), base(b.path())], ImageHost::new())
        .unwrap()
        .with_vfs(vfs.clone());

    let first = loader.resolve_unit("pkg.X").unwrap();
    assert_eq!(first.name(), "pkg.X");
    assert_eq!(first.origin(), Origin::Defined);
    assert!(path.starts_with(b.path()));
    assert_eq!(vfs.reads(), 1);

    let second = loader.resolve_unit("pkg.X").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(vfs.reads(), 1);
    assert_eq!(loader.host().materialized_count(), 1);
}

#[test]
fn test_earliest_base_wins() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    write_raw(
        a.path(),
        "pkg.X",
        &shade_core::ImageWriter::new("pkg.X").payload(b"from a".to_vec()).finish().unwrap(),
    );
    write_raw(
        b.path(),
        "pkg.X",
        &shade_core::ImageWriter::new("pkg.X").payload(b"from b".to_vec()).finish().unwrap(),
    );

    let loader = UnitLoader::new([base(a.path()), base(b.path())], ImageHost::new()).unwrap();
    assert_eq!(loader.resolve_unit("pkg.X").unwrap().payload(), b"from a");

    let loader = UnitLoader::new([base(b.path()), base(a.path())], ImageHost::new()).unwrap();
    assert_eq!(loader.resolve_unit("pkg.X").unwrap().payload(), b"from b");
}

#[test]
fn test_absent_unit_falls_back_to_host() {
    let a = tempfile::tempdir().unwrap();
    let host = ImageHost::new();
    let system = host.register_builtin(&image_for("sys.Y")).unwrap();
    let loader = UnitLoader::new([base(a.path())], host).unwrap();

    let unit = loader.resolve_unit("sys.Y").unwrap();
    assert!(Arc::ptr_eq(&unit, &system));
    assert_eq!(unit.origin(), Origin::System);
    assert!(!loader.is_cached("sys.Y"));
    assert_eq!(loader.cache_size(), 0);
}

#[test]
fn test_absent_everywhere_reports_host_failure() {
    let a = tempfile::tempdir().unwrap();
    let loader = UnitLoader::new([base(a.path())], ImageHost::new()).unwrap();

    let err = loader.resolve_unit("sys.Y").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.cause(),
        Some(&NotFoundCause::Delegated(HostError::UnitNotFound {
            name: "sys.Y".to_string()
        }))
    );
    assert_eq!(loader.cache_size(), 0);
}

#[test]
fn test_corrupt_unit_is_malformed_and_not_cached() {
    let a = tempfile::tempdir().unwrap();
    let path = write_raw(a.path(), "pkg.Bad", b"SHDU\x01\x00\x00\x00\xFF");
    let loader = UnitLoader::new([base(a.path())], ImageHost::new()).unwrap();

    let err = loader.resolve_unit("pkg.Bad").unwrap_err();
    match err.cause() {
        Some(NotFoundCause::MalformedUnit { path: reported, source }) => {
            assert_eq!(reported, &path);
            assert_eq!(source.name(), "pkg.Bad");
        }
        other => panic!("expected MalformedUnit, got {other:?}"),
    }
    assert!(loader.cached("pkg.Bad").is_none());
}

#[test]
fn test_wrong_declared_name_is_malformed() {
    let a = tempfile::tempdir().unwrap();
    write_raw(a.path(), "pkg.X", &image_for("pkg.Other"));
    let loader = UnitLoader::new([base(a.path())], ImageHost::new()).unwrap();

    assert!(loader.resolve_unit("pkg.X").unwrap_err().is_malformed());
}

#[test]
fn test_short_read_is_io_failure() {
    let a = tempfile::tempdir().unwrap();
    write_unit(a.path(), "pkg.X");
    let loader = UnitLoader::new([base(a.path())], ImageHost::new())
        .unwrap()
        .with_vfs(Arc::new(HalfReadFileSystem::default()));

    let err = loader.resolve_unit("pkg.X").unwrap_err();
    match err.cause() {
        Some(NotFoundCause::IoFailure { source, .. }) => {
            assert!(matches!(source, VfsError::ShortRead { .. }));
        }
        other => panic!("expected IoFailure, got {other:?}"),
    }
    assert_eq!(loader.host().materialized_count(), 0);
    assert_eq!(loader.cache_size(), 0);
}

#[test]
fn test_failure_does_not_affect_other_names() {
    let a = tempfile::tempdir().unwrap();
    write_raw(a.path(), "pkg.Bad", b"garbage");
    write_unit(a.path(), "pkg.Good");
    let loader = UnitLoader::new([base(a.path())], ImageHost::new()).unwrap();

    assert!(loader.resolve_unit("pkg.Bad").is_err());
    assert!(loader.resolve_unit("pkg.Good").is_ok());
    assert!(loader.resolve_unit("pkg.Bad").is_err());
    assert_eq!(loader.cache_size(), 1);
}

#[test]
fn test_loader_caches_are_isolated() {
    let a = tempfile::tempdir().unwrap();
    write_unit(a.path(), "pkg.X");
    let host = Arc::new(ImageHost::new());

    let first = UnitLoader::new([base(a.path())], Arc::clone(&host)).unwrap();
    let second = UnitLoader::new([base(a.path())], Arc::clone(&host)).unwrap();

    let x1 = first.resolve_unit("pkg.X").unwrap();
    assert!(!second.is_cached("pkg.X"));
    let x2 = second.resolve_unit("pkg.X").unwrap();

    assert!(!Arc::ptr_eq(&x1, &x2));
    assert_eq!(host.materialized_count(), 2);
}

/// A unit on the private search path shadows the host's unit of the same
/// name, and the two handles are different units.
#[test]
fn test_local_unit_shadows_host_unit() {
    let a = tempfile::tempdir().unwrap();
    write_raw(
        a.path(),
        "api.Greeter",
        &shade_core::ImageWriter::new("api.Greeter")
            .interface(true)
            .payload(b"private copy".to_vec())
            .finish()
            .unwrap(),
    );

    let host = ImageHost::new();
    let shared = host
        .register_builtin(
            &shade_core::ImageWriter::new("api.Greeter")
                .interface(true)
                .payload(b"shared copy".to_vec())
                .finish()
                .unwrap(),
        )
        .unwrap();
    let loader = UnitLoader::new([base(a.path())], host).unwrap();

    let local = loader.resolve_unit("api.Greeter").unwrap();
    assert_eq!(local.payload(), b"private copy");
    assert_eq!(local.origin(), Origin::Defined);
    assert!(!Arc::ptr_eq(&local, &shared));
    assert!(Arc::ptr_eq(
        &loader.host().default_resolve("api.Greeter").unwrap(),
        &shared
    ));
}

#[test]
fn test_load_with_link() {
    let a = tempfile::tempdir().unwrap();
    write_raw(
        a.path(),
        "app.Main",
        &shade_core::ImageWriter::new("app.Main")
            .dependency("sys.Core")
            .finish()
            .unwrap(),
    );
    let host = ImageHost::new();
    let loader = UnitLoader::new([base(a.path())], host).unwrap();

    let err = loader.load_unit("app.Main", true).unwrap_err();
    assert!(matches!(
        err,
        LoadError::LinkFailed {
            source: HostError::LinkFailed { .. },
            ..
        }
    ));

    loader.host().register_builtin(&image_for("sys.Core")).unwrap();
    let unit = loader.load_unit("app.Main", true).unwrap();
    assert_eq!(unit.dependencies(), ["sys.Core".to_string()]);
}

#[test]
fn test_resource_lookup() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    std::fs::write(b.path().join("banner.txt"), b"hi").unwrap();
    let loader = UnitLoader::new([base(a.path()), base(b.path())], ImageHost::new()).unwrap();

    let location = loader.resolve_resource("banner.txt").unwrap();
    assert!(location.path().starts_with(b.path()));
    assert_eq!(loader.read_resource(&location).unwrap(), b"hi");
    assert!(loader.resolve_resource("missing.txt").is_none());

    std::fs::remove_file(location.path()).unwrap();
    assert!(matches!(
        loader.read_resource(&location),
        Err(LoadError::Resource { .. })
    ));
}
