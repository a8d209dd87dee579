//! Classification of raw dependency tokens.
//!
//! Rules are checked in order; the first match decides:
//!
//! 1. contains `*`, starts with a URL scheme, or contains `.tar.gz`
//!    ⇒ [`Token::Locator`]
//! 2. starts with `+` ⇒ [`Token::DevOverride`] (the `+` is stripped)
//! 3. starts with `-` ⇒ [`Token::BuildArg`] (kept verbatim)
//! 4. anything else ⇒ [`Token::Package`]

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Regex for a URL scheme prefix such as `http://` or `s3://`.
static SCHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]{1,5}://").expect("Invalid scheme regex")
});

/// Whether `location` starts with a URL scheme.
pub fn is_url(location: &str) -> bool {
    SCHEME_REGEX.is_match(location)
}

/// A classified dependency token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Token {
    /// An OS package to install before compiling.
    Package(String),
    /// Location of a prebuilt extension archive, before templating.
    Locator(String),
    /// A package to install only when compiling.
    DevOverride(String),
    /// An argument passed through to the extension build.
    BuildArg(String),
}

impl Token {
    /// Classify a raw token. Pure: depends only on the token text.
    pub fn classify(raw: &str) -> Self {
        if raw.contains('*') || is_url(raw) || raw.contains(".tar.gz") {
            Token::Locator(raw.to_string())
        } else if let Some(rest) = raw.strip_prefix('+') {
            Token::DevOverride(rest.to_string())
        } else if raw.starts_with('-') {
            Token::BuildArg(raw.to_string())
        } else {
            Token::Package(raw.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*", Token::Locator("*".into()))]
    #[case("*/linux/*", Token::Locator("*/linux/*".into()))]
    #[case("https://example.com/x", Token::Locator("https://example.com/x".into()))]
    #[case("s3://bucket/x", Token::Locator("s3://bucket/x".into()))]
    #[case("vendor/foo.tar.gz", Token::Locator("vendor/foo.tar.gz".into()))]
    #[case("+libfoo-dev", Token::DevOverride("libfoo-dev".into()))]
    #[case("--with-foo-dir=/opt", Token::BuildArg("--with-foo-dir=/opt".into()))]
    #[case("-j4", Token::BuildArg("-j4".into()))]
    #[case("libxml2-dev", Token::Package("libxml2-dev".into()))]
    fn test_classify(#[case] raw: &str, #[case] expected: Token) {
        assert_eq!(Token::classify(raw), expected);
    }

    #[test]
    fn test_locator_rules_take_priority() {
        assert_eq!(Token::classify("+foo.tar.gz"), Token::Locator("+foo.tar.gz".into()));
        assert_eq!(Token::classify("-*"), Token::Locator("-*".into()));
    }

    #[rstest]
    #[case("http://host/x", true)]
    #[case("HTTPS://host/x", true)]
    #[case("x://host", false)]
    #[case("toolong://host", false)]
    #[case("1ab://host", false)]
    #[case("/abs/path", false)]
    fn test_is_url(#[case] location: &str, #[case] expected: bool) {
        assert_eq!(is_url(location), expected);
    }

    #[test]
    fn test_dev_override_split() {
        let tokens: Vec<Token> = "+pkg-a pkg-b".split_whitespace().map(Token::classify).collect();
        assert_eq!(
            tokens,
            vec![
                Token::DevOverride("pkg-a".into()),
                Token::Package("pkg-b".into())
            ]
        );
    }
}
