//! Resolution facade
//!
//! Turns a descriptor into everything the build glue needs: the package
//! identifier, the concrete ref, the local base directory, the subpath, and
//! whether the ref was floating (so the caller should remember what it got).
//!
//! Overridden sources never touch the cache or the network. Within one pass a
//! [`ResolutionContext`] remembers what was already resolved, so a package
//! pulled in by several dependents is fetched once.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::cache::{FetchPolicy, SourceCache};
use crate::config::Config;
use crate::descriptor::{self, IncludeMode};
use crate::error::Result;
use crate::identity::PackageId;
use crate::oracle::{GitRemote, RefSource};

/// A fully resolved package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub id: PackageId,
    /// Concrete ref; `None` only for an overridden source requested without one
    pub git_ref: Option<String>,
    pub base: PathBuf,
    pub sub_path: String,
    /// The descriptor pinned no ref; the caller should persist `git_ref`
    pub needs_caching: bool,
}

impl Resolution {
    /// `base` joined with `sub_path`
    pub fn include_path(&self) -> PathBuf {
        self.base.join(self.sub_path.trim_start_matches('/'))
    }
}

/// Packages resolved so far in one pass, keyed by identifier
#[derive(Debug, Default)]
pub struct ResolutionContext {
    visited: HashMap<PackageId, Resolution>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &PackageId) -> bool {
        self.visited.contains_key(id)
    }

    pub fn get(&self, id: &PackageId) -> Option<&Resolution> {
        self.visited.get(id)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    fn record(&mut self, resolution: Resolution) {
        self.visited.insert(resolution.id.clone(), resolution);
    }
}

pub struct Resolver<'a, S = GitRemote> {
    config: &'a Config,
    cache: &'a SourceCache<S>,
}

impl<'a, S: RefSource> Resolver<'a, S> {
    pub fn new(config: &'a Config, cache: &'a SourceCache<S>) -> Self {
        Self { config, cache }
    }

    /// Identifier of `descriptor` without resolving its ref
    pub fn identify(&self, descriptor: &str, mode: IncludeMode) -> Result<PackageId> {
        let spec = descriptor::parse(descriptor, None, mode, self.config.url_template())?;
        Ok(PackageId::derive(&spec.url, &spec.sub_path))
    }

    /// Resolve `descriptor` to a local directory.
    ///
    /// A package already resolved in `ctx` at the same ref (or requested
    /// without one) is returned from `ctx`. Requesting it at a different ref
    /// resolves again and the later request wins.
    pub fn resolve(
        &self,
        ctx: &mut ResolutionContext,
        descriptor: &str,
        fallback_version: Option<&str>,
        mode: IncludeMode,
        policy: FetchPolicy,
    ) -> Result<Resolution> {
        let spec = descriptor::parse(descriptor, fallback_version, mode, self.config.url_template())?;
        let id = PackageId::derive(&spec.url, &spec.sub_path);
        let needs_caching = spec.git_ref.is_none();

        if let Some(previous) = ctx.get(&id) {
            match (spec.git_ref.as_deref(), previous.git_ref.as_deref()) {
                (Some(requested), Some(resolved)) if requested != resolved => {
                    warn!(
                        "{} requested at both {} and {}; using {}",
                        spec.url, resolved, requested, requested
                    );
                }
                _ => {
                    debug!("{} already resolved in this pass", spec.url);
                    return Ok(Resolution {
                        needs_caching,
                        ..previous.clone()
                    });
                }
            }
        }

        let resolution = match self.config.overrides().get(&spec.url) {
            Some(local) => {
                debug!("Using local override {} for {}", local.display(), spec.url);
                Resolution {
                    id,
                    git_ref: spec.git_ref,
                    base: local.to_path_buf(),
                    sub_path: spec.sub_path,
                    needs_caching,
                }
            }
            None => {
                let fetched = self.cache.fetch(&spec.url, spec.git_ref.as_deref(), policy)?;
                Resolution {
                    id,
                    git_ref: Some(fetched.git_ref),
                    base: fetched.path,
                    sub_path: spec.sub_path,
                    needs_caching,
                }
            }
        };

        ctx.record(resolution.clone());
        Ok(resolution)
    }
}
