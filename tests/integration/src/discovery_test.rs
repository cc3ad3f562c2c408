//! End-to-end discovery tests: scan package dirs, then connect.

use ext_discovery::ModuleSpec;
use ext_registry::ConnectOptions;
use ext_test_utils::{PackageDirBuilder, StubLoader, TestRegistry, TestScanner};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_scan_then_connect_across_packages() {
    let packages = PackageDirBuilder::new();
    packages.package(
        "pkg-storage",
        r#"
[extensions."storage.backend"]
disk = "disk_impl"
memory = { module = "memory_impl", export = "open" }
"#,
    );
    packages.package(
        "pkg-telemetry",
        r#"
[extensions."telemetry.sink"]
stdout = "stdout_impl"
"#,
    );

    let loader = StubLoader::new();
    let mut registry = TestRegistry::new();
    TestScanner::new(loader.clone()).scan_dirs([packages.root()], &mut registry);

    assert_eq!(registry.names("storage.backend"), ["disk", "memory"]);
    assert_eq!(registry.names("telemetry.sink"), ["stdout"]);
    // Lazy: nothing loaded until a connect invokes a factory.
    assert!(loader.loads().is_empty());

    let resolved = registry
        .connect_all(&(), "storage.backend", ConnectOptions::new())
        .await
        .unwrap();
    let instances: Vec<&str> = resolved.iter().map(|r| r.instance.as_str()).collect();
    assert_eq!(instances, ["disk_impl", "memory_impl::open"]);
    assert_eq!(loader.loads().len(), 2);

    // Repeat connects reuse the resolved factories.
    registry
        .connect_all(&(), "storage.backend", ConnectOptions::new())
        .await
        .unwrap();
    assert_eq!(loader.loads().len(), 2);
}

#[tokio::test]
async fn test_unloadable_module_degrades_to_no_instance() {
    let packages = PackageDirBuilder::new();
    packages.package(
        "pkg",
        r#"
[extensions."storage.backend"]
broken = "missing"
disk = "disk_impl"
"#,
    );

    let loader = StubLoader::new();
    let mut registry = TestRegistry::new();
    TestScanner::new(loader.clone()).scan_dirs([packages.root()], &mut registry);

    // `broken` is registered — the registry never learns the load failed.
    assert!(registry.contains("storage.backend", "broken"));
    assert_eq!(registry.names("storage.backend"), ["broken", "disk"]);

    let resolved = registry
        .connect_all(&(), "storage.backend", ConnectOptions::new())
        .await
        .unwrap();
    let names: Vec<&str> = resolved.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["disk"]);

    // Single mode falls back past the unloadable implementation.
    let fallback = registry
        .connect_one(&(), "storage.backend", ConnectOptions::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fallback.name, "disk");

    // Two invocations of `broken`, but the failed load was attempted once.
    let attempts: Vec<ModuleSpec> = loader
        .loads()
        .into_iter()
        .filter(|spec| spec.module.as_deref() == Some("missing"))
        .collect();
    assert_eq!(attempts.len(), 1);
}

#[tokio::test]
async fn test_malformed_and_manifestless_packages_are_skipped() {
    let packages = PackageDirBuilder::new();
    packages.package(
        "pkg-ok",
        r#"
[extensions."storage.backend"]
disk = "disk_impl"
"#,
    );
    packages.package("pkg-bad", "[extensions]\nnot-a-table = 3");
    packages.package_without_manifest("pkg-plain");

    let mut registry = TestRegistry::new();
    TestScanner::new(StubLoader::new()).scan_dirs([packages.root()], &mut registry);

    assert_eq!(registry.names("storage.backend"), ["disk"]);
    assert_eq!(registry.len(), 1);

    let resolved = registry
        .connect_one(&(), "storage.backend", ConnectOptions::new().required())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.instance, "disk_impl");
}

#[tokio::test]
async fn test_discovered_auto_flag_and_explicit_selection() {
    let packages = PackageDirBuilder::new();
    packages.package(
        "pkg",
        r#"
[extensions."auth.provider"]
ldap = { module = "ldap_impl", auto = false }
local = "local_impl"
"#,
    );

    let mut registry = TestRegistry::new();
    TestScanner::new(StubLoader::new()).scan_dirs([packages.root()], &mut registry);

    // Implicit resolution sees only the auto extension.
    let implicit = registry
        .connect_all(&(), "auth.provider", ConnectOptions::new())
        .await
        .unwrap();
    let names: Vec<&str> = implicit.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["local"]);

    // Explicit alternatives reach the opt-in one.
    let resolved = registry
        .connect_one(
            &(),
            "auth.provider",
            ConnectOptions::new().alternatives(["ldap", "local"]),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.instance, "ldap_impl");
}
