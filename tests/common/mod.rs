//! Common test utilities for qdep integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use git2::{Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// A scratch cache directory plus a `qdep` command bound to it
pub struct TestCache {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestCache {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("cache");
        Self { temp, path }
    }

    /// `qdep` with the cache pointed at this directory
    pub fn cmd(&self) -> Command {
        let mut cmd = qdep_cmd();
        cmd.env("QDEP_CACHE_DIR", &self.path);
        cmd
    }
}

/// `qdep` with no `QDEP_*` settings from the outer environment.
///
/// The cache points at a directory that commands without cache access never create.
// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn qdep_cmd() -> Command {
    let mut cmd = Command::cargo_bin("qdep").expect("Failed to find qdep binary");
    cmd.env("QDEP_CACHE_DIR", std::env::temp_dir().join("qdep-tests-unused-cache"));
    for var in [
        "QDEP_SOURCE_OVERRIDE",
        "QDEP_DEFAULT_PKG_FN",
        "QDEP_VERSION_ORDERING",
        "QDEP_LOCK_MODE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// A local package repository at `<tempdir>/<name>.git` with a `main` branch
pub struct PackageRepo {
    pub temp: TempDir,
    pub path: PathBuf,
    repo: Repository,
}

impl PackageRepo {
    pub fn new(name: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join(format!("{name}.git"));
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let repo = Repository::init_opts(&path, &options).expect("Failed to init repository");
        Self { temp, path, repo }
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.path.display())
    }

    /// Write and commit a file on the current branch
    pub fn commit_file(&self, name: &str, content: &str) {
        let file = self.path.join(name);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file, content).expect("Failed to write file");

        let mut index = self.repo.index().expect("Failed to open index");
        index.add_path(Path::new(name)).expect("Failed to stage file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");
        let signature = Signature::now("qdep", "qdep@example.com").expect("Failed to sign");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &signature, &signature, "Update", &tree, &parents)
            .expect("Failed to commit");
    }

    pub fn tag(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD");
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .expect("Failed to tag");
    }
}
