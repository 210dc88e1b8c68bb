//! Package descriptor parsing
//!
//! A descriptor names a package, an optional ref, and an optional path to the
//! file a build should include:
//!
//! ```text
//! (<owner>/<repo> | <url-or-scp-ending-in-.git>)(@<ref>(/<subpath>)?)?
//! ```
//!
//! Examples:
//! - `acme/widgets`
//! - `acme/widgets@1.2.0/widgets.pri`
//! - `https://git.example.com/acme/widgets.git@master`
//! - `git@git.example.com:acme/widgets.git@1.2.0/src/widgets.pri`
//!
//! Shorthands are expanded through a URL template (`https://github.com/{}.git`
//! by default). When no subpath is given, it defaults to
//! `/<lowercased repo name>.pri`, or `.pro` for linked sub-projects.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::URL_TEMPLATE_MARKER;
use crate::error::{Result, descriptor::invalid};

static DESCRIPTOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:([^@/]+/[^@/]+)|(\w+://.*\.git|[^@:]*@[^@]*:[^@]+\.git))(?:@([^/\s]+)(/.*)?)?$",
    )
    .unwrap_or_else(|e| unreachable!("descriptor pattern is a valid regex: {e}"))
});

static REPO_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*/([^/]+)/?\.git$")
        .unwrap_or_else(|e| unreachable!("repository name pattern is a valid regex: {e}"))
});

/// Suffix of the default include file for plain dependencies
pub const INCLUDE_SUFFIX: &str = ".pri";

/// Suffix of the default project file for linked sub-project dependencies
pub const PROJECT_SUFFIX: &str = ".pro";

/// How the dependency is consumed, which selects the default subpath suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncludeMode {
    /// Included into the dependent project (`.pri`)
    #[default]
    Include,
    /// Built as its own sub-project and linked (`.pro`)
    Project,
}

impl IncludeMode {
    pub fn from_project_flag(project: bool) -> Self {
        if project { Self::Project } else { Self::Include }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Include => INCLUDE_SUFFIX,
            Self::Project => PROJECT_SUFFIX,
        }
    }
}

/// The repository part of a descriptor, as written by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// `owner/repo`, expanded through the URL template
    Shorthand(String),
    /// An explicit transport URL or SCP-style address ending in `.git`
    Url(String),
}

impl SourceRef {
    /// The source as written, without expansion
    pub fn as_str(&self) -> &str {
        match self {
            Self::Shorthand(s) | Self::Url(s) => s,
        }
    }

    /// Expand into a full source URL
    pub fn expand(&self, url_template: &str) -> String {
        match self {
            Self::Shorthand(short) => url_template.replace(URL_TEMPLATE_MARKER, short),
            Self::Url(url) => url.clone(),
        }
    }
}

/// A syntactically valid descriptor, before URL expansion and defaulting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    input: String,
    source: SourceRef,
    git_ref: Option<String>,
    sub_path: Option<String>,
}

impl Descriptor {
    /// Parse a descriptor string, rejecting anything outside the grammar
    pub fn parse(input: &str) -> Result<Self> {
        let caps = DESCRIPTOR_PATTERN
            .captures(input)
            .ok_or_else(|| invalid(input, "does not match owner/repo or a .git URL"))?;

        let source = if let Some(short) = caps.get(1) {
            SourceRef::Shorthand(short.as_str().to_string())
        } else if let Some(url) = caps.get(2) {
            SourceRef::Url(url.as_str().to_string())
        } else {
            return Err(invalid(input, "missing repository"));
        };

        Ok(Self {
            input: input.to_string(),
            source,
            git_ref: caps.get(3).map(|m| m.as_str().to_string()),
            sub_path: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    pub fn source(&self) -> &SourceRef {
        &self.source
    }

    /// The ref pinned in the descriptor itself, if any
    pub fn git_ref(&self) -> Option<&str> {
        self.git_ref.as_deref()
    }

    /// The subpath written in the descriptor itself, if any
    pub fn sub_path(&self) -> Option<&str> {
        self.sub_path.as_deref()
    }

    /// Render this descriptor with a different ref, keeping the source as written
    /// and the explicit subpath (if there was one)
    pub fn with_ref(&self, git_ref: &str) -> String {
        format!(
            "{}@{}{}",
            self.source.as_str(),
            git_ref,
            self.sub_path.as_deref().unwrap_or_default()
        )
    }

    /// Expand the source and fill in the ref fallback and the default subpath
    pub fn resolve(
        &self,
        fallback_version: Option<&str>,
        mode: IncludeMode,
        url_template: &str,
    ) -> Result<PackageSpec> {
        let url = self.source.expand(url_template);

        let git_ref = self
            .git_ref
            .clone()
            .or_else(|| fallback_version.map(str::to_string));

        let sub_path = match &self.sub_path {
            Some(path) => path.clone(),
            None => {
                let name = repository_name(&url).ok_or_else(|| {
                    invalid(
                        &self.input,
                        format!("cannot derive a default path from '{url}'"),
                    )
                })?;
                format!("/{}{}", name.to_lowercase(), mode.suffix())
            }
        };

        Ok(PackageSpec {
            url,
            git_ref,
            sub_path,
        })
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}

/// A parsed package: full source URL, optional ref, and subpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub url: String,
    pub git_ref: Option<String>,
    pub sub_path: String,
}

impl PackageSpec {
    /// `url@ref/subpath`, or `None` while the ref is unresolved
    pub fn expanded_name(&self) -> Option<String> {
        self.git_ref
            .as_ref()
            .map(|git_ref| format!("{}@{}{}", self.url, git_ref, self.sub_path))
    }
}

/// Parse `descriptor` into (source URL, ref, subpath).
///
/// `fallback_version` is used when the descriptor pins no ref. `mode` picks the
/// default subpath suffix.
pub fn parse(
    descriptor: &str,
    fallback_version: Option<&str>,
    mode: IncludeMode,
    url_template: &str,
) -> Result<PackageSpec> {
    Descriptor::parse(descriptor)?.resolve(fallback_version, mode, url_template)
}

/// Base name of a repository URL ending in `.git`
fn repository_name(url: &str) -> Option<&str> {
    REPO_NAME_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_URL_TEMPLATE;
    use crate::error::QdepError;

    fn parse_default(input: &str) -> Result<PackageSpec> {
        parse(input, None, IncludeMode::Include, DEFAULT_URL_TEMPLATE)
    }

    #[test]
    fn test_shorthand_with_ref_and_path() {
        let spec = parse_default("acme/widgets@v2/widgets.pri").unwrap();
        assert_eq!(spec.url, "https://github.com/acme/widgets.git");
        assert_eq!(spec.git_ref.as_deref(), Some("v2"));
        assert_eq!(spec.sub_path, "/widgets.pri");
    }

    #[test]
    fn test_shorthand_without_ref() {
        let spec = parse_default("acme/widgets").unwrap();
        assert_eq!(spec.url, "https://github.com/acme/widgets.git");
        assert_eq!(spec.git_ref, None);
        assert_eq!(spec.sub_path, "/widgets.pri");
    }

    #[test]
    fn test_fallback_version_used_only_without_ref() {
        let spec = parse("acme/widgets", Some("1.0.0"), IncludeMode::Include, DEFAULT_URL_TEMPLATE)
            .unwrap();
        assert_eq!(spec.git_ref.as_deref(), Some("1.0.0"));

        let spec = parse(
            "acme/widgets@2.0.0",
            Some("1.0.0"),
            IncludeMode::Include,
            DEFAULT_URL_TEMPLATE,
        )
        .unwrap();
        assert_eq!(spec.git_ref.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_project_mode_suffix() {
        let spec = parse("acme/widgets@1.0", None, IncludeMode::Project, DEFAULT_URL_TEMPLATE)
            .unwrap();
        assert_eq!(spec.sub_path, "/widgets.pro");
    }

    #[test]
    fn test_default_path_is_lowercased() {
        let spec = parse_default("Acme/QtWidgets").unwrap();
        assert_eq!(spec.url, "https://github.com/Acme/QtWidgets.git");
        assert_eq!(spec.sub_path, "/qtwidgets.pri");
    }

    #[test]
    fn test_https_url_with_ref_and_nested_path() {
        let spec =
            parse_default("https://git.example.com/acme/widgets.git@1.2.0/src/core/core.pri")
                .unwrap();
        assert_eq!(spec.url, "https://git.example.com/acme/widgets.git");
        assert_eq!(spec.git_ref.as_deref(), Some("1.2.0"));
        assert_eq!(spec.sub_path, "/src/core/core.pri");
    }

    #[test]
    fn test_scp_url() {
        let spec = parse_default("git@git.example.com:acme/widgets.git@master").unwrap();
        assert_eq!(spec.url, "git@git.example.com:acme/widgets.git");
        assert_eq!(spec.git_ref.as_deref(), Some("master"));
        assert_eq!(spec.sub_path, "/widgets.pri");
    }

    #[test]
    fn test_file_url() {
        let spec = parse_default("file:///srv/git/widgets.git").unwrap();
        assert_eq!(spec.url, "file:///srv/git/widgets.git");
        assert_eq!(spec.git_ref, None);
        assert_eq!(spec.sub_path, "/widgets.pri");
    }

    #[test]
    fn test_custom_url_template() {
        let spec = parse(
            "acme/widgets@1.0",
            None,
            IncludeMode::Include,
            "ssh://git@git.example.com/{}.git",
        )
        .unwrap();
        assert_eq!(spec.url, "ssh://git@git.example.com/acme/widgets.git");
    }

    #[test]
    fn test_invalid_descriptors() {
        for input in [
            "",
            "widgets",
            "acme/widgets/extra",
            "acme@host/widgets",
            "acme/widgets@",
            "acme/widgets@1.0 /x.pri",
            "https://example.com/acme/widgets",
            "git@example.com/acme/widgets.git",
            "https://example.com/acme/widgets.git@",
        ] {
            let result = parse_default(input);
            assert!(
                matches!(result, Err(QdepError::InvalidDescriptor { .. })),
                "expected '{input}' to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn test_invalid_descriptor_keeps_input() {
        match parse_default("not a package") {
            Err(QdepError::InvalidDescriptor { descriptor, .. }) => {
                assert_eq!(descriptor, "not a package");
            }
            other => panic!("Expected InvalidDescriptor, got {other:?}"),
        }
    }

    #[test]
    fn test_template_without_git_suffix_cannot_default_path() {
        let result = parse(
            "acme/widgets",
            None,
            IncludeMode::Include,
            "https://example.com/{}",
        );
        assert!(matches!(result, Err(QdepError::InvalidDescriptor { .. })));

        // An explicit path does not need the repository name
        let spec = parse(
            "acme/widgets@1.0/widgets.pri",
            None,
            IncludeMode::Include,
            "https://example.com/{}",
        )
        .unwrap();
        assert_eq!(spec.url, "https://example.com/acme/widgets");
    }

    #[test]
    fn test_descriptor_parts_unexpanded() {
        let descriptor = Descriptor::parse("acme/widgets@1.0.0/src/widgets.pri").unwrap();
        assert_eq!(
            descriptor.source(),
            &SourceRef::Shorthand("acme/widgets".to_string())
        );
        assert_eq!(descriptor.git_ref(), Some("1.0.0"));
        assert_eq!(descriptor.sub_path(), Some("/src/widgets.pri"));
    }

    #[test]
    fn test_with_ref_keeps_source_and_path() {
        let descriptor = Descriptor::parse("acme/widgets@1.0.0/src/widgets.pri").unwrap();
        assert_eq!(
            descriptor.with_ref("1.2.0"),
            "acme/widgets@1.2.0/src/widgets.pri"
        );

        let descriptor = Descriptor::parse("https://x.org/a/b.git@1.0.0").unwrap();
        assert_eq!(descriptor.with_ref("2.0.0"), "https://x.org/a/b.git@2.0.0");
    }

    #[test]
    fn test_expanded_name() {
        let spec = parse_default("acme/widgets@1.0").unwrap();
        assert_eq!(
            spec.expanded_name().as_deref(),
            Some("https://github.com/acme/widgets.git@1.0/widgets.pri")
        );
        assert_eq!(parse_default("acme/widgets").unwrap().expanded_name(), None);
    }
}
