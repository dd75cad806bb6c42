//! Login credential resolution
//!
//! Input fields win over environment variables; a blank input field falls
//! back to the matching variable; with neither the crawl runs unauthenticated.

mod env;

pub use env::{EnvProvider, MapEnv, ProcessEnv};

use crate::input::ActorInput;
use std::fmt;

/// Environment variable consulted when `youtube_email` is blank
pub const EMAIL_ENV_VAR: &str = "YOUTUBE_EMAIL";

/// Environment variable consulted when `youtube_password` is blank
pub const PASSWORD_ENV_VAR: &str = "YOUTUBE_PASSWORD";

/// A string that never prints its contents
///
/// Not `Serialize`; the only way out is [`Secret::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value. Only call this when typing it into a form.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Resolved login credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<Secret>,
}

impl Credentials {
    /// No email and no password
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    /// Both email and password are present, so a login can be attempted
    pub fn is_complete(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}

/// Resolves credentials from the input, falling back to the environment
///
/// Missing credentials are not an error: the result is simply empty.
///
/// # Example
///
/// ```
/// use tube_harvest::credentials::{resolve_credentials, MapEnv};
/// use tube_harvest::input::ActorInput;
///
/// let env = MapEnv::new().with("YOUTUBE_EMAIL", "env@example.com");
/// let creds = resolve_credentials(&ActorInput::default(), &env);
/// assert_eq!(creds.email.as_deref(), Some("env@example.com"));
/// assert!(creds.password.is_none());
/// ```
pub fn resolve_credentials(input: &ActorInput, env: &dyn EnvProvider) -> Credentials {
    let email = pick(input.youtube_email.as_deref(), env.var(EMAIL_ENV_VAR));
    let password = pick(input.youtube_password.as_deref(), env.var(PASSWORD_ENV_VAR)).map(Secret);

    Credentials { email, password }
}

fn pick(from_input: Option<&str>, from_env: Option<String>) -> Option<String> {
    match from_input {
        Some(value) if !value.trim().is_empty() => Some(value.to_string()),
        _ => from_env.filter(|value| !value.trim().is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with(email: Option<&str>, password: Option<&str>) -> ActorInput {
        ActorInput {
            youtube_email: email.map(str::to_string),
            youtube_password: password.map(str::to_string),
            ..ActorInput::default()
        }
    }

    #[test]
    fn test_input_email_wins_over_env() {
        let env = MapEnv::new().with(EMAIL_ENV_VAR, "env@example.com");
        let creds = resolve_credentials(&input_with(Some("input@example.com"), None), &env);
        assert_eq!(creds.email.as_deref(), Some("input@example.com"));
    }

    #[test]
    fn test_blank_input_email_falls_back_to_env() {
        let env = MapEnv::new().with(EMAIL_ENV_VAR, "env@example.com");

        let creds = resolve_credentials(&input_with(Some("   "), None), &env);
        assert_eq!(creds.email.as_deref(), Some("env@example.com"));

        let creds = resolve_credentials(&input_with(None, None), &env);
        assert_eq!(creds.email.as_deref(), Some("env@example.com"));
    }

    #[test]
    fn test_password_resolution_mirrors_email() {
        let env = MapEnv::new().with(PASSWORD_ENV_VAR, "from-env");

        let creds = resolve_credentials(&input_with(None, Some("from-input")), &env);
        assert_eq!(creds.password.as_ref().map(Secret::expose), Some("from-input"));

        let creds = resolve_credentials(&input_with(None, Some("")), &env);
        assert_eq!(creds.password.as_ref().map(Secret::expose), Some("from-env"));
    }

    #[test]
    fn test_both_sources_absent_yields_empty_credentials() {
        let creds = resolve_credentials(&input_with(None, None), &MapEnv::new());
        assert!(creds.is_empty());
        assert!(!creds.is_complete());
    }

    #[test]
    fn test_blank_env_value_is_ignored() {
        let env = MapEnv::new().with(EMAIL_ENV_VAR, " ");
        let creds = resolve_credentials(&input_with(None, None), &env);
        assert!(creds.email.is_none());
    }

    #[test]
    fn test_secret_never_formats_its_value() {
        let creds = resolve_credentials(
            &input_with(Some("me@example.com"), Some("hunter2")),
            &MapEnv::new(),
        );
        assert!(creds.is_complete());

        let debug = format!("{:?}", creds);
        assert!(debug.contains("me@example.com"));
        assert!(!debug.contains("hunter2"));

        let secret = creds.password.unwrap();
        assert_eq!(secret.to_string(), "<redacted>");
        assert_eq!(secret.expose(), "hunter2");
    }
}
