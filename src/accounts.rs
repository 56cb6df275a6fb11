//! Accounts
//!
//! Sign-up and sign-in forms, and their orchestration over the remote
//! [`AuthService`]. A failed remote call never touches the local session.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    session::{Session, SessionUser},
    storage::StorageError,
    validation::{
        Field, PatternError, Patterns, ValidationErrors,
        rules::{required, text},
    },
};

/// Shortest accepted password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Failures reported by the auth service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteServiceError {
    /// Email and password do not match an account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account.
    #[error("an account with this email already exists")]
    AccountExists,

    /// The service could not be reached or failed.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// Account errors
#[derive(Debug, Error)]
pub enum AccountsError {
    /// The form has invalid fields.
    #[error("please correct the highlighted fields: {0}")]
    Invalid(ValidationErrors),

    /// The auth service rejected or failed the request.
    #[error(transparent)]
    Remote(#[from] RemoteServiceError),

    /// The local session could not be updated.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Validated sign-in credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Lowercased email
    pub email: String,

    /// Password as typed
    pub password: String,
}

/// Validated sign-up details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Trimmed name
    pub name: String,

    /// Lowercased email
    pub email: String,

    /// Normalized phone number, if given
    pub phone: Option<String>,

    /// Password as typed
    pub password: String,
}

/// Sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInForm {
    /// Email
    pub email: String,

    /// Password
    pub password: String,
}

impl SignInForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns every invalid field.
    pub fn validate(&self, patterns: &Patterns) -> Result<Credentials, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = errors.check(Field::Email, patterns.email(&self.email, "Email"));
        let password = errors.check(
            Field::Password,
            required(&self.password, "Password is required").map(|_| self.password.clone()),
        );

        errors.into_result(|| {
            Some(Credentials {
                email: email?,
                password: password?,
            })
        })
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignUpForm {
    /// Full name
    pub name: String,

    /// Email
    pub email: String,

    /// Phone, optional
    pub phone: String,

    /// Password
    pub password: String,

    /// Password, again
    pub confirm_password: String,
}

impl SignUpForm {
    /// Validate the form, including the password confirmation.
    ///
    /// # Errors
    ///
    /// Returns every invalid field. A confirmation mismatch is reported on
    /// `confirmPassword`.
    pub fn validate(&self, patterns: &Patterns) -> Result<NewAccount, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = errors.check(Field::Name, text(&self.name, "Name", 2, 100));
        let email = errors.check(Field::Email, patterns.email(&self.email, "Email"));
        let phone = if self.phone.trim().is_empty() {
            Some(None)
        } else {
            errors
                .check(Field::Phone, patterns.phone(&self.phone))
                .map(Some)
        };

        let password = if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                Field::Password,
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
            None
        } else {
            Some(self.password.clone())
        };

        if self.confirm_password != self.password {
            errors.add(Field::ConfirmPassword, "Passwords don't match");
        }

        errors.into_result(|| {
            Some(NewAccount {
                name: name?,
                email: email?,
                phone: phone?,
                password: password?,
            })
        })
    }
}

/// Remote authentication collaborator.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate an existing account.
    async fn sign_in(&self, credentials: Credentials) -> Result<SessionUser, RemoteServiceError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, account: NewAccount) -> Result<SessionUser, RemoteServiceError>;

    /// The session the service currently considers active, if any.
    async fn current_session(&self) -> Result<Option<SessionUser>, RemoteServiceError>;
}

/// Account flows over an [`AuthService`].
#[derive(Clone)]
pub struct Accounts {
    auth: Arc<dyn AuthService>,
    patterns: &'static Patterns,
}

impl std::fmt::Debug for Accounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accounts").finish_non_exhaustive()
    }
}

impl Accounts {
    /// Create the account flows.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the built-in patterns fail to compile.
    pub fn new(auth: Arc<dyn AuthService>) -> Result<Self, PatternError> {
        Ok(Self {
            auth,
            patterns: Patterns::builtin()?,
        })
    }

    /// Validate `form`, sign in remotely and replace `session`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError::Invalid`] or [`AccountsError::Remote`]; the
    /// session is unchanged in both cases.
    pub async fn sign_in(
        &self,
        form: &SignInForm,
        session: &mut Session,
    ) -> Result<SessionUser, AccountsError> {
        let credentials = form.validate(self.patterns).map_err(AccountsError::Invalid)?;

        debug!(email = %credentials.email, "signing in");

        let user = self.auth.sign_in(credentials).await?;

        Ok(Self::establish(session, user))
    }

    /// Validate `form`, create the account remotely and replace `session`.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError::Invalid`] or [`AccountsError::Remote`]; the
    /// session is unchanged in both cases.
    pub async fn sign_up(
        &self,
        form: &SignUpForm,
        session: &mut Session,
    ) -> Result<SessionUser, AccountsError> {
        let account = form.validate(self.patterns).map_err(AccountsError::Invalid)?;

        debug!(email = %account.email, "signing up");

        let user = self.auth.sign_up(account).await?;

        Ok(Self::establish(session, user))
    }

    /// Align `session` with the service's view of the current session.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError::Remote`] if the service fails, leaving the
    /// session as it was, or [`AccountsError::Storage`] if a sign-out could
    /// not be persisted.
    pub async fn refresh(&self, session: &mut Session) -> Result<(), AccountsError> {
        match self.auth.current_session().await? {
            Some(user) => {
                Self::establish(session, user);
            }
            None if session.is_authenticated() => session.sign_out()?,
            None => {}
        }

        Ok(())
    }

    fn establish(session: &mut Session, user: SessionUser) -> SessionUser {
        if let Err(error) = session.establish(user.clone()) {
            warn!(%error, "failed to persist session; keeping it for this run");
        }

        user
    }
}
