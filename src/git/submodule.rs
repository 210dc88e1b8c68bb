//! Recursive submodule initialization and update

use git2::{Repository, SubmoduleUpdateOptions};
use tracing::debug;

use super::auth::authenticated_fetch_options;

/// Initialize and update every submodule of `repo`, recursing into nested ones.
///
/// Submodules are fetched with full history so the recorded commit is always reachable.
pub fn update_submodules(repo: &Repository) -> Result<(), git2::Error> {
    for mut submodule in repo.submodules()? {
        debug!(
            "Updating submodule {}",
            submodule.name().unwrap_or("<unnamed>")
        );

        let mut update_options = SubmoduleUpdateOptions::new();
        update_options.fetch(authenticated_fetch_options());
        submodule.update(true, Some(&mut update_options))?;

        let nested = submodule.open()?;
        update_submodules(&nested)?;
    }
    Ok(())
}
