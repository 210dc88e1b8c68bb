//! Git authentication configuration
//!
//! Authentication is delegated to git's native credential system:
//! - SSH agent and keys from ~/.ssh/
//! - Git credential helpers
//! - Anonymous access for public remotes

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, FetchOptions, RemoteCallbacks};

const SSH_KEY_NAMES: &[&str] = &["id_ed25519", "id_rsa", "id_ecdsa"];

fn auth_failed(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn try_anonymous_credentials() -> Option<Cred> {
    ["git", "anonymous"]
        .iter()
        .find_map(|username| Cred::userpass_plaintext(username, "").ok())
}

fn try_ssh_key_files(username: &str) -> Result<Cred, Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    for key_name in SSH_KEY_NAMES {
        let private_key = ssh_dir.join(key_name);
        if !private_key.exists() {
            continue;
        }
        let public_key = ssh_dir.join(format!("{key_name}.pub"));
        let public_key_path = public_key.exists().then_some(public_key.as_path());

        if let Ok(cred) = Cred::ssh_key(username, public_key_path, &private_key, None) {
            return Ok(cred);
        }
    }

    Err(auth_failed("SSH key not found"))
}

fn try_user_pass_credentials(url: &str, username_from_url: Option<&str>) -> Result<Cred, Error> {
    let config = match git2::Config::open_default() {
        Ok(cfg) => cfg,
        Err(_) => git2::Config::new()?,
    };

    if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
        return Ok(cred);
    }

    if let Some(username) = username_from_url {
        if let Ok(cred) = Cred::userpass_plaintext(username, "") {
            return Ok(cred);
        }
    }

    try_anonymous_credentials().ok_or_else(|| auth_failed("authentication failed"))
}

/// Install credential callbacks on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            return match username_from_url {
                Some(username) => {
                    Cred::ssh_key_from_agent(username).or_else(|_| try_ssh_key_files(username))
                }
                None => try_anonymous_credentials()
                    .ok_or_else(|| auth_failed("authentication failed")),
            };
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return try_user_pass_credentials(url, username_from_url);
        }

        Err(auth_failed("authentication failed"))
    });
}

/// Fetch options carrying credential callbacks
pub fn authenticated_fetch_options<'cb>() -> FetchOptions<'cb> {
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);

    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks);
    fetch_options
}
