//! Turning resolved tokens into a concrete plan of work.

use serde::Serialize;

use crate::locator::LocatorTemplate;
use crate::token::Token;

/// Which token kinds a plan keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    /// Install OS packages and fetch prebuilt archives.
    Dependencies,
    /// Compile locally: install dev-override packages and pass build args.
    Compile,
}

/// Work derived from a package's resolved tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyPlan {
    /// OS packages to install.
    pub packages: Vec<String>,
    /// Expanded archive locations to fetch and unpack.
    pub locators: Vec<String>,
    /// Arguments for the extension build.
    pub build_args: Vec<String>,
}

impl DependencyPlan {
    /// Classify `tokens` and keep the kinds relevant to `mode`.
    ///
    /// In dependency mode, dev overrides and build args are ignored; in
    /// compile mode, plain packages and locators are ignored and dev
    /// overrides become the packages to install.
    pub fn from_tokens<S: AsRef<str>>(
        tokens: &[S],
        mode: BuildMode,
        template: &LocatorTemplate,
    ) -> Self {
        let mut plan = Self::default();
        for raw in tokens {
            match (Token::classify(raw.as_ref()), mode) {
                (Token::Package(name), BuildMode::Dependencies)
                | (Token::DevOverride(name), BuildMode::Compile) => plan.packages.push(name),
                (Token::Locator(locator), BuildMode::Dependencies) => {
                    plan.locators.push(template.expand(&locator))
                }
                (Token::BuildArg(arg), BuildMode::Compile) => plan.build_args.push(arg),
                (token, _) => {
                    tracing::debug!(?token, ?mode, "token not used in this mode");
                }
            }
        }
        plan
    }

    /// Whether the plan has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.locators.is_empty() && self.build_args.is_empty()
    }
}

/// Split tokens into OS package names and expanded archive locations.
pub fn classify_and_expand<S: AsRef<str>>(
    tokens: &[S],
    template: &LocatorTemplate,
) -> (Vec<String>, Vec<String>) {
    let plan = DependencyPlan::from_tokens(tokens, BuildMode::Dependencies, template);
    (plan.packages, plan.locators)
}
