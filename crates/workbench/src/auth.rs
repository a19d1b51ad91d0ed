use snafu::ensure;

use super::error::{LoginRejectedSnafu, MissingPasswordSnafu, MissingUsernameSnafu, WorkbenchResult};

/// Mock sign-in state, passed explicitly to whichever views need it.
///
/// Any non-empty username is accepted; the password only has to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    username: Option<String>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Stores the trimmed username. The password is not checked.
    pub fn login(&mut self, username: &str, _password: &str) -> WorkbenchResult<()> {
        let username = username.trim();
        ensure!(
            !username.is_empty(),
            LoginRejectedSnafu {
                stage: "auth-login"
            }
        );

        self.username = Some(username.to_string());
        tracing::info!("signed in as {username}");
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(username) = self.username.take() {
            tracing::info!("signed out {username}");
        }
    }
}

/// Form-level checks run before [`AuthSession::login`]; first failure wins.
pub fn validate_login_form(username: &str, password: &str) -> WorkbenchResult<()> {
    ensure!(
        !username.trim().is_empty(),
        MissingUsernameSnafu {
            stage: "validate-login-form"
        }
    );
    ensure!(
        !password.trim().is_empty(),
        MissingPasswordSnafu {
            stage: "validate-login-form"
        }
    );
    Ok(())
}

/// Runs form validation then the login itself, as the sign-in button does.
pub fn submit_login_form(
    session: &mut AuthSession,
    username: &str,
    password: &str,
) -> WorkbenchResult<()> {
    validate_login_form(username, password)?;
    session.login(username, password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkbenchError;

    #[test]
    fn login_accepts_any_non_empty_username() {
        let mut auth = AuthSession::new();
        assert!(!auth.is_logged_in());

        auth.login("  alice ", "").expect("password is not checked");
        assert!(auth.is_logged_in());
        assert_eq!(auth.username(), Some("alice"));
    }

    #[test]
    fn blank_username_is_rejected_by_login() {
        let mut auth = AuthSession::new();
        assert!(matches!(
            auth.login("   ", "secret"),
            Err(WorkbenchError::LoginRejected { .. })
        ));
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn logout_clears_state() {
        let mut auth = AuthSession::new();
        auth.login("bob", "pw").expect("login");

        auth.logout();
        assert!(!auth.is_logged_in());
        assert_eq!(auth.username(), None);
    }

    #[test]
    fn form_checks_username_before_password() {
        let mut auth = AuthSession::new();

        assert!(matches!(
            submit_login_form(&mut auth, "", ""),
            Err(WorkbenchError::MissingUsername { .. })
        ));
        assert!(matches!(
            submit_login_form(&mut auth, "carol", " "),
            Err(WorkbenchError::MissingPassword { .. })
        ));
        assert!(!auth.is_logged_in());

        submit_login_form(&mut auth, "carol", "pw").expect("valid form");
        assert_eq!(auth.username(), Some("carol"));
    }
}
