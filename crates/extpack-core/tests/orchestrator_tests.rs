use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use extpack_core::{
    BuildOrchestrator, BuildOutcome, Directive, Error, ExtensionBuilder, ManifestCache, Notify,
    PackageDescriptor, Result, Settings,
};
use extpack_test_utils::tree::{sample_extension_tree, snapshot};
use extpack_test_utils::workspace::TestWorkspace;
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorder {
    says: Mutex<Vec<String>>,
    warns: Mutex<Vec<String>>,
}

impl Recorder {
    fn says(&self) -> Vec<String> {
        self.says.lock().unwrap().clone()
    }

    fn warns(&self) -> Vec<String> {
        self.warns.lock().unwrap().clone()
    }
}

impl Notify for Recorder {
    fn say(&self, message: &str) {
        self.says.lock().unwrap().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warns.lock().unwrap().push(message.to_string());
    }
}

/// Builder that fills the extension directory and records its arguments.
#[derive(Default)]
struct FakeBuilder {
    calls: Vec<Vec<String>>,
}

impl ExtensionBuilder for FakeBuilder {
    fn build(&mut self, extension_dir: &Path, args: &[String]) -> Result<()> {
        self.calls.push(args.to_vec());
        sample_extension_tree(extension_dir);
        Ok(())
    }
}

struct FailingBuilder;

impl ExtensionBuilder for FailingBuilder {
    fn build(&mut self, _: &Path, _: &[String]) -> Result<()> {
        Err(Error::build("compiler exploded"))
    }
}

fn orchestrator(ws: &TestWorkspace, directive: Directive) -> (BuildOrchestrator, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let orchestrator = BuildOrchestrator::new(
        Settings::new(directive, ws.work_dir()),
        Arc::new(ManifestCache::new()),
    )
    .with_notifier(recorder.clone());
    (orchestrator, recorder)
}

fn publish_archive(ws: &TestWorkspace, relative: &str) -> PathBuf {
    let source = ws.root().join("source");
    sample_extension_tree(&source);
    let dest = ws.manifest_dir().join(relative);
    std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
    extpack_fs::write_tarball(&source, &dest).unwrap();
    source
}

fn dependencies(manifest: &Path) -> Directive {
    Directive::Dependencies {
        manifest: manifest.to_string_lossy().into_owned(),
    }
}

#[test]
fn test_dependencies_mode_unpacks_prebuilt_archive() {
    let ws = TestWorkspace::new();
    let source = publish_archive(&ws, "foo-1.2.3.tar.gz");
    let manifest = ws.write_manifest("gems:\n  foo: \"*\"\n");
    let (orchestrator, recorder) = orchestrator(&ws, dependencies(&manifest));

    let outcome = orchestrator
        .build_extensions(
            &PackageDescriptor::new("foo", "1.2.3"),
            &ws.ext_dir(),
            &mut FakeBuilder::default(),
        )
        .unwrap();

    let archive = ws.manifest_dir().join("foo-1.2.3.tar.gz");
    match outcome {
        BuildOutcome::Applied {
            plan,
            packages_installed,
        } => {
            assert!(packages_installed);
            assert!(plan.packages.is_empty());
            assert_eq!(plan.locators, vec![archive.to_string_lossy().into_owned()]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(snapshot(&ws.ext_dir()), snapshot(&source));
    assert_eq!(
        recorder.says(),
        vec![format!(
            "* Extracting '{}' to '{}'",
            archive.display(),
            ws.ext_dir().display()
        )]
    );
}

#[test]
fn test_relative_manifest_resolves_against_work_dir() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_bytes("work/conf/deps.yml", b"gems:\n  foo: \"*\"\n");
    let source = ws.root().join("source");
    sample_extension_tree(&source);
    let archive = manifest.with_file_name("foo-1.2.3.tar.gz");
    extpack_fs::write_tarball(&source, &archive).unwrap();

    // The process directory is not the work dir, so only work_dir can find it
    assert_ne!(std::env::current_dir().unwrap(), ws.work_dir());
    let (orchestrator, _) = orchestrator(
        &ws,
        Directive::Dependencies {
            manifest: "conf/deps.yml".to_string(),
        },
    );
    let package = PackageDescriptor::new("foo", "1.2.3");

    let plan = orchestrator.plan(&package).unwrap().unwrap();
    assert_eq!(plan.locators, vec![archive.to_string_lossy().into_owned()]);

    let outcome = orchestrator
        .build_extensions(&package, &ws.ext_dir(), &mut FakeBuilder::default())
        .unwrap();
    assert!(matches!(outcome, BuildOutcome::Applied { .. }));
    assert_eq!(snapshot(&ws.ext_dir()), snapshot(&source));
}

#[test]
fn test_dependencies_mode_does_not_build() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest("gems:\n  foo: \"*\"\n");
    publish_archive(&ws, "foo-1.2.3.tar.gz");
    let (orchestrator, _) = orchestrator(&ws, dependencies(&manifest));

    let mut builder = FakeBuilder::default();
    let outcome = orchestrator
        .build_extensions(&PackageDescriptor::new("foo", "1.2.3"), &ws.ext_dir(), &mut builder)
        .unwrap();

    assert!(builder.calls.is_empty());
    assert!(!outcome.needs_host_build());
}

#[test]
fn test_absent_entry_has_no_dependencies() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest("gems:\n  bar: libbar-dev\n");
    let (orchestrator, recorder) = orchestrator(&ws, dependencies(&manifest));

    let outcome = orchestrator
        .build_extensions(
            &PackageDescriptor::new("foo", "1.0.0"),
            &ws.ext_dir(),
            &mut FakeBuilder::default(),
        )
        .unwrap();

    assert_eq!(outcome, BuildOutcome::NoDependencies);
    assert!(recorder.says().is_empty());
}

#[test]
fn test_missing_archive_is_fatal() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest("gems:\n  foo: \"*\"\n");
    let (orchestrator, _) = orchestrator(&ws, dependencies(&manifest));

    let err = orchestrator
        .build_extensions(
            &PackageDescriptor::new("foo", "1.2.3"),
            &ws.ext_dir(),
            &mut FakeBuilder::default(),
        )
        .unwrap_err();

    assert!(matches!(err, Error::Manifest(_)), "got {err:?}");
}

#[test]
fn test_missing_manifest_is_fatal() {
    let ws = TestWorkspace::new();
    let (orchestrator, _) = orchestrator(
        &ws,
        dependencies(&ws.manifest_dir().join("absent.yml")),
    );

    let err = orchestrator
        .build_extensions(
            &PackageDescriptor::new("foo", "1.2.3"),
            &ws.ext_dir(),
            &mut FakeBuilder::default(),
        )
        .unwrap_err();

    assert!(err.to_string().contains("absent.yml"), "got {err}");
}

#[test]
fn test_packages_without_install_command_is_error() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest("gems:\n  foo: libfoo-dev\n");
    let (orchestrator, _) = orchestrator(&ws, dependencies(&manifest));

    let err = orchestrator
        .build_extensions(
            &PackageDescriptor::new("foo", "1.2.3"),
            &ws.ext_dir(),
            &mut FakeBuilder::default(),
        )
        .unwrap_err();

    assert!(matches!(err, Error::MissingInstallCommand));
}

#[cfg(unix)]
#[test]
fn test_install_failure_warns_and_continues() {
    let ws = TestWorkspace::new();
    let source = publish_archive(&ws, "foo-1.2.3.tar.gz");
    let manifest = ws.write_manifest(
        "gems:\n  \"*\":\n    command: \"false ${packages}\"\n  foo: libfoo-dev *\n",
    );
    let (orchestrator, recorder) = orchestrator(&ws, dependencies(&manifest));

    let outcome = orchestrator
        .build_extensions(
            &PackageDescriptor::new("foo", "1.2.3"),
            &ws.ext_dir(),
            &mut FakeBuilder::default(),
        )
        .unwrap();

    assert!(matches!(
        outcome,
        BuildOutcome::Applied {
            packages_installed: false,
            ..
        }
    ));
    assert_eq!(recorder.warns(), vec!["Unable to execute: false libfoo-dev"]);
    assert_eq!(recorder.says()[0], "* Installing 'libfoo-dev'");
    assert_eq!(snapshot(&ws.ext_dir()), snapshot(&source));
}

#[test]
fn test_self_package_builds_and_archives() {
    let ws = TestWorkspace::new();
    let (orchestrator, recorder) = orchestrator(&ws, Directive::SelfPackage);

    let mut builder = FakeBuilder::default();
    let outcome = orchestrator
        .build_extensions(&PackageDescriptor::new("foo", "1.2.3"), &ws.ext_dir(), &mut builder)
        .unwrap();

    let archive = ws.work_dir().join("foo-1.2.3.tar.gz");
    assert!(matches!(outcome, BuildOutcome::Packaged { archive: ref a, .. } if *a == archive));
    assert_eq!(builder.calls, vec![Vec::<String>::new()]);
    ws.assert_file_exists("work/foo-1.2.3.tar.gz");
    assert_eq!(
        recorder.says(),
        vec![format!("Extensions packaged as {}", archive.display())]
    );
}

#[test]
fn test_compile_mode_passes_build_args() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest("gems:\n  ffi: --enable-system-libffi -j4\n");
    let (orchestrator, _) = orchestrator(
        &ws,
        Directive::Compile {
            manifest: manifest.to_string_lossy().into_owned(),
        },
    );

    let mut builder = FakeBuilder::default();
    let outcome = orchestrator
        .build_extensions(&PackageDescriptor::new("ffi", "1.16.3"), &ws.ext_dir(), &mut builder)
        .unwrap();

    assert_eq!(
        builder.calls,
        vec![vec!["--enable-system-libffi".to_string(), "-j4".to_string()]]
    );
    match outcome {
        BuildOutcome::Packaged { archive, plan } => {
            assert_eq!(archive, ws.work_dir().join("ffi-1.16.3.tar.gz"));
            assert!(plan.packages.is_empty());
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_build_failure_propagates() {
    let ws = TestWorkspace::new();
    let (orchestrator, _) = orchestrator(&ws, Directive::SelfPackage);

    let err = orchestrator
        .build_extensions(&PackageDescriptor::new("foo", "1.2.3"), &ws.ext_dir(), &mut FailingBuilder)
        .unwrap_err();

    assert!(matches!(err, Error::Build { .. }));
    ws.assert_file_not_exists("work/foo-1.2.3.tar.gz");
}

#[test]
fn test_cache_is_shared_between_packages() {
    let ws = TestWorkspace::new();
    let manifest = ws.write_manifest("gems:\n  foo: \"*\"\n  bar: \"*/bar/*\"\n");
    publish_archive(&ws, "foo-1.0.0.tar.gz");
    let cache = Arc::new(ManifestCache::new());
    let settings = Settings::new(dependencies(&manifest), ws.work_dir());

    let first = BuildOrchestrator::for_package(true, settings.clone(), cache.clone()).unwrap();
    first
        .build_extensions(
            &PackageDescriptor::new("foo", "1.0.0"),
            &ws.ext_dir(),
            &mut FakeBuilder::default(),
        )
        .unwrap();

    // The manifest is gone, but the cached copy still resolves `bar`
    std::fs::remove_file(&manifest).unwrap();
    let second = BuildOrchestrator::for_package(true, settings, cache).unwrap();
    let plan = second
        .plan(&PackageDescriptor::new("bar", "2.0.0"))
        .unwrap()
        .unwrap();

    assert_eq!(
        plan.locators,
        vec![
            ws.manifest_dir()
                .join("bar")
                .join("bar-2.0.0.tar.gz")
                .to_string_lossy()
                .into_owned()
        ]
    );
}
