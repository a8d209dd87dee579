//! The build-mode state machine.
//!
//! A [`BuildOrchestrator`] is created once per package that declares native
//! extensions. [`BuildOrchestrator::build_extensions`] then runs exactly one
//! of the four modes selected by the [`Directive`] and reports what it did
//! as a [`BuildOutcome`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use extpack_manifest::{
    BuildMode, DependencyPlan, Fetch, Fetcher, LocatorTemplate, Manifest, ManifestCache,
    PackageDescriptor, resolve, token::is_url,
};

use crate::config::{Directive, Settings};
use crate::error::{Error, Result};
use crate::host::{ExtensionBuilder, Notify, TracingNotifier};
use crate::installer::{InstallCommand, PackageInstaller};

/// What [`BuildOrchestrator::build_extensions`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// No directive; the host should run its default build.
    Skipped,
    /// The manifest has nothing for this package or version.
    NoDependencies,
    /// OS packages were installed and prebuilt archives unpacked.
    Applied {
        plan: DependencyPlan,
        /// `false` if the install command failed and was only warned about.
        packages_installed: bool,
    },
    /// Extensions were built and archived.
    Packaged {
        archive: PathBuf,
        plan: DependencyPlan,
    },
}

impl BuildOutcome {
    /// Whether the host still has to build the extensions itself.
    pub fn needs_host_build(&self) -> bool {
        matches!(self, BuildOutcome::Skipped)
    }
}

/// Drives one package's extension build according to the directive.
pub struct BuildOrchestrator {
    settings: Settings,
    cache: Arc<ManifestCache>,
    fetcher: Arc<dyn Fetch>,
    notifier: Arc<dyn Notify>,
}

impl BuildOrchestrator {
    /// Create an orchestrator using the HTTP/file [`Fetcher`] and
    /// [`TracingNotifier`].
    pub fn new(settings: Settings, cache: Arc<ManifestCache>) -> Self {
        let fetcher = Arc::new(Fetcher::new(settings.fetch.clone()));
        Self {
            settings,
            cache,
            fetcher,
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Orchestrator for a package, or `None` if it has no native extensions.
    pub fn for_package(
        has_extensions: bool,
        settings: Settings,
        cache: Arc<ManifestCache>,
    ) -> Option<Self> {
        if !has_extensions {
            tracing::debug!("package has no native extensions");
            return None;
        }
        Some(Self::new(settings, cache))
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notify>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn directive(&self) -> &Directive {
        &self.settings.directive
    }

    /// Resolve `package` against the directive's manifest.
    ///
    /// Returns `None` when the directive names no manifest or the manifest
    /// has nothing for this package and version.
    pub fn plan(&self, package: &PackageDescriptor) -> Result<Option<DependencyPlan>> {
        let (location, mode) = match &self.settings.directive {
            Directive::Compile { manifest } => (manifest, BuildMode::Compile),
            Directive::Dependencies { manifest } => (manifest, BuildMode::Dependencies),
            Directive::NoOp | Directive::SelfPackage => return Ok(None),
        };
        let manifest = self.manifest(location)?;
        Ok(self.plan_with(&manifest, package, mode))
    }

    /// Run the selected mode for `package`.
    pub fn build_extensions(
        &self,
        package: &PackageDescriptor,
        extension_dir: &Path,
        builder: &mut dyn ExtensionBuilder,
    ) -> Result<BuildOutcome> {
        tracing::info!(
            package = %package.full_name(),
            directive = %self.settings.directive,
            "building extensions"
        );

        match &self.settings.directive {
            Directive::NoOp => Ok(BuildOutcome::Skipped),
            Directive::SelfPackage => {
                builder.build(extension_dir, &[])?;
                self.package(package, extension_dir, DependencyPlan::default())
            }
            Directive::Compile { manifest } => {
                let manifest = self.manifest(manifest)?;
                let plan = self
                    .plan_with(&manifest, package, BuildMode::Compile)
                    .unwrap_or_default();
                self.installer(&manifest).install(&plan.packages)?;
                builder.build(extension_dir, &plan.build_args)?;
                self.package(package, extension_dir, plan)
            }
            Directive::Dependencies { manifest } => {
                let manifest = self.manifest(manifest)?;
                match self.plan_with(&manifest, package, BuildMode::Dependencies) {
                    Some(plan) => self.apply(&manifest, plan, extension_dir),
                    None => Ok(BuildOutcome::NoDependencies),
                }
            }
        }
    }

    fn manifest(&self, location: &str) -> Result<Arc<Manifest>> {
        let location = self.manifest_location(location);
        Ok(self.cache.load(&location, self.fetcher.as_ref())?)
    }

    /// A relative file location names a manifest under the working directory.
    fn manifest_location(&self, location: &str) -> String {
        if is_url(location) || Path::new(location).is_absolute() {
            return location.to_string();
        }
        self.settings
            .work_dir
            .join(location)
            .to_string_lossy()
            .into_owned()
    }

    fn plan_with(
        &self,
        manifest: &Manifest,
        package: &PackageDescriptor,
        mode: BuildMode,
    ) -> Option<DependencyPlan> {
        let Some(tokens) = resolve(manifest, package) else {
            tracing::debug!(package = %package.full_name(), "no manifest entry applies");
            return None;
        };
        // Locators expand relative to the manifest the cache actually holds
        let location = self
            .cache
            .location()
            .or_else(|| {
                self.settings
                    .directive
                    .manifest()
                    .map(|location| self.manifest_location(location))
            })
            .unwrap_or_default();
        let template =
            LocatorTemplate::new(&location, &self.settings.work_dir, package.archive_name());
        let plan = DependencyPlan::from_tokens(&tokens, mode, &template);
        tracing::debug!(package = %package.full_name(), ?plan, "resolved dependency plan");
        Some(plan)
    }

    fn installer(&self, manifest: &Manifest) -> PackageInstaller {
        PackageInstaller::new(
            manifest.install_command().map(InstallCommand::new),
            Arc::clone(&self.notifier),
        )
    }

    fn apply(
        &self,
        manifest: &Manifest,
        plan: DependencyPlan,
        extension_dir: &Path,
    ) -> Result<BuildOutcome> {
        let packages_installed = self.installer(manifest).install(&plan.packages)?;

        for locator in &plan.locators {
            self.notifier.say(&format!(
                "* Extracting '{}' to '{}'",
                locator,
                extension_dir.display()
            ));
            let bytes = self.fetcher.fetch(locator)?;
            let summary = extpack_fs::extract_tarball(&bytes, extension_dir)?;
            tracing::info!(locator = %locator, entries = summary.len(), "unpacked extension archive");
        }

        Ok(BuildOutcome::Applied {
            plan,
            packages_installed,
        })
    }

    fn package(
        &self,
        package: &PackageDescriptor,
        extension_dir: &Path,
        plan: DependencyPlan,
    ) -> Result<BuildOutcome> {
        if !extension_dir.is_dir() {
            return Err(Error::ExtensionDirNotFound {
                path: extension_dir.to_path_buf(),
            });
        }
        let archive = self.settings.work_dir.join(package.archive_name());
        let written = extpack_fs::write_tarball(extension_dir, &archive)?;
        tracing::info!(archive = %archive.display(), bytes = written, "packaged extensions");
        self.notifier
            .say(&format!("Extensions packaged as {}", archive.display()));
        Ok(BuildOutcome::Packaged { archive, plan })
    }
}
