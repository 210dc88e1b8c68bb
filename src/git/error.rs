//! Git error handling
//!
//! Turns git2 errors into short, user-facing reasons.

use git2::{Error, ErrorClass};

#[derive(Clone, Copy)]
enum ErrorKind {
    RepositoryNotFound,
    AuthenticationFailed,
    PermissionDenied,
    NetworkError,
    HttpCertificate,
    HttpSsl,
    Other(ErrorClass),
}

type ErrorCheck = fn(&str, ErrorClass) -> bool;

const ERROR_CLASSIFICATIONS: &[(ErrorCheck, ErrorKind)] = &[
    (
        |msg, class| {
            class != ErrorClass::Reference
                && (msg.contains("not found")
                    || msg.contains("404")
                    || msg.contains("too many redirects")
                    || msg.contains("authentication replays"))
        },
        ErrorKind::RepositoryNotFound,
    ),
    (
        |msg, _| msg.contains("authentication") || msg.contains("credentials"),
        ErrorKind::AuthenticationFailed,
    ),
    (
        |msg, _| msg.contains("permission denied") || msg.contains("access denied"),
        ErrorKind::PermissionDenied,
    ),
    (
        |msg, _| {
            msg.contains("connection")
                || msg.contains("network")
                || msg.contains("timeout")
                || msg.contains("timed out")
                || msg.contains("failed to resolve address")
        },
        ErrorKind::NetworkError,
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("certificate"),
        ErrorKind::HttpCertificate,
    ),
    (
        |msg, class| class == ErrorClass::Http && msg.contains("ssl"),
        ErrorKind::HttpSsl,
    ),
];

fn classify(msg: &str, class: ErrorClass) -> ErrorKind {
    ERROR_CLASSIFICATIONS
        .iter()
        .find(|(check, _)| check(msg, class))
        .map_or(ErrorKind::Other(class), |(_, kind)| *kind)
}

/// Interpret a git2 error as a user-friendly reason
pub fn interpret_git_error(err: &Error) -> String {
    let message = err.message().to_lowercase();

    match classify(&message, err.class()) {
        ErrorKind::RepositoryNotFound => "Repository not found".to_string(),
        ErrorKind::AuthenticationFailed => "Authentication failed".to_string(),
        ErrorKind::PermissionDenied => "Permission denied".to_string(),
        ErrorKind::NetworkError => "Network error".to_string(),
        ErrorKind::HttpCertificate => "Certificate error".to_string(),
        ErrorKind::HttpSsl => "SSL error".to_string(),
        ErrorKind::Other(ErrorClass::Http) => format!("HTTP error: {}", err.message()),
        ErrorKind::Other(ErrorClass::Ssh) => format!("SSH error: {}", err.message()),
        ErrorKind::Other(_) => err.message().to_string(),
    }
}
