//! Local source repositories for transport and cache tests

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

/// A non-bare repository at `<tempdir>/widgets.git`
pub struct SourceRepo {
    repo: Repository,
    path: PathBuf,
    _dir: TempDir,
}

impl SourceRepo {
    /// Empty repository whose default branch is `main`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let path = dir.path().join("widgets.git");
        let repo = Repository::init_opts(&path, &options).expect("Failed to init repository");
        Self {
            repo,
            path,
            _dir: dir,
        }
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.path.display())
    }

    /// Write `name` and commit it on the current branch
    pub fn commit_file(&self, name: &str, content: &str) -> Oid {
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
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                &format!("Update {name}"),
                &tree,
                &parents,
            )
            .expect("Failed to commit")
    }

    /// Lightweight tag on HEAD
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

    /// Branch off HEAD without switching to it
    pub fn branch(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD");
        self.repo
            .branch(name, &head, false)
            .expect("Failed to create branch");
    }

    /// Point `branch` at a new root commit holding only `name`, as a force push would
    pub fn rewrite_branch(&self, branch: &str, name: &str, content: &str) -> Oid {
        let blob = self
            .repo
            .blob(content.as_bytes())
            .expect("Failed to write blob");
        let mut builder = self.repo.treebuilder(None).expect("Failed to build tree");
        builder
            .insert(name, blob, 0o100644)
            .expect("Failed to insert blob");
        let tree_id = builder.write().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let signature = Signature::now("qdep", "qdep@example.com").expect("Failed to sign");
        let commit = self
            .repo
            .commit(None, &signature, &signature, "Rewrite history", &tree, &[])
            .expect("Failed to commit");
        self.repo
            .reference(&format!("refs/heads/{branch}"), commit, true, "rewrite")
            .expect("Failed to move branch");
        commit
    }
}
