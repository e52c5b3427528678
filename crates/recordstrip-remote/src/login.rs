use std::sync::Arc;

use tracing::{debug, info};

use recordstrip_core::model::DriverProfile;

use crate::auth::{AuthService, AuthUser};
use crate::errors::RemoteError;
use crate::store::ProfileStore;

/// Sign-up during silent migration is only attempted for passwords the
/// hosted service will accept.
pub const MIN_SIGNUP_PASSWORD_LEN: usize = 6;

/// Why a login was turned away. Wrong identifier and wrong password are
/// deliberately indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    InvalidCredentials,
    /// The profile matched but `is_active` is false.
    Disabled,
}

impl LoginRejection {
    /// User-facing message for this rejection.
    pub fn message(&self) -> &'static str {
        match self {
            LoginRejection::InvalidCredentials => "Credenciais incorretas",
            LoginRejection::Disabled => {
                "Seu acesso está desativado. Contate o administrador."
            }
        }
    }
}

/// Terminal state of a login attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated(DriverProfile),
    Rejected(LoginRejection),
}

/// Reconciles the two credential models into one logical session.
///
/// The resolver first tries hosted-auth sign-in when the identifier looks
/// like an email, fetching the profile by its `auth_id` link. When that
/// yields nothing it falls back to the legacy credential row (phone or email
/// column plus the plaintext password column, both matched by the
/// row-store), and on a legacy match opportunistically migrates the profile
/// to a hosted identity. Migration is best-effort: no failure in it may
/// block a successful legacy login.
pub struct LoginResolver {
    profiles: Arc<dyn ProfileStore>,
    auth: Arc<dyn AuthService>,
}

impl LoginResolver {
    pub fn new(profiles: Arc<dyn ProfileStore>, auth: Arc<dyn AuthService>) -> Self {
        Self { profiles, auth }
    }

    /// Resolve `identifier` (email or phone) plus `password` to a profile.
    ///
    /// Errors are remote-operation failures on the required path; rejections
    /// (wrong credentials, disabled account) are ordinary outcomes.
    pub async fn resolve(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<LoginOutcome, RemoteError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(RemoteError::Validation(
                "identifier and password are required".into(),
            ));
        }

        let mut profile: Option<DriverProfile> = None;
        let mut hosted_user: Option<AuthUser> = None;

        // Fast path: hosted-auth sign-in, only plausible for emails.
        if identifier.contains('@') {
            match self.auth.sign_in_with_password(identifier, password).await {
                Ok(session) => {
                    hosted_user = Some(session.user.clone());
                    match self.profiles.by_auth_id(session.user.id).await {
                        Ok(found) => profile = found,
                        Err(err) => {
                            debug!(
                                event = "login.profile_by_auth_failed",
                                domain = "login",
                                error = %err
                            );
                        }
                    }
                }
                Err(err) => {
                    debug!(event = "login.hosted_signin_failed", domain = "login", error = %err);
                }
            }
        }

        // Legacy path: covers phone identifiers and never-migrated profiles.
        if profile.is_none() {
            profile = self
                .profiles
                .by_legacy_credentials(identifier, password)
                .await?;
            if let Some(found) = profile.as_mut() {
                debug!(event = "login.legacy_match", domain = "login", profile_id = %found.id);
                self.migrate_silently(found, password, hosted_user).await;
            }
        }

        match profile {
            Some(found) if !found.is_active => {
                info!(event = "login.rejected_disabled", domain = "login", profile_id = %found.id);
                Ok(LoginOutcome::Rejected(LoginRejection::Disabled))
            }
            Some(found) => {
                info!(event = "login.authenticated", domain = "login", profile_id = %found.id);
                Ok(LoginOutcome::Authenticated(found))
            }
            None => Ok(LoginOutcome::Rejected(LoginRejection::InvalidCredentials)),
        }
    }

    /// Best-effort migration of a legacy profile to a hosted identity.
    /// Every failure here is swallowed; the legacy login already succeeded.
    async fn migrate_silently(
        &self,
        profile: &mut DriverProfile,
        password: &str,
        hosted_user: Option<AuthUser>,
    ) {
        let mut current = self.auth.current_session().await.map(|s| s.user);

        if current.is_none() {
            if let Some(email) = profile.email.clone() {
                match self.auth.sign_in_with_password(&email, password).await {
                    Ok(session) => current = Some(session.user),
                    Err(sign_in_err) => {
                        debug!(
                            event = "login.migration_signin_failed",
                            domain = "login",
                            error = %sign_in_err
                        );
                        if password.len() >= MIN_SIGNUP_PASSWORD_LEN {
                            match self
                                .auth
                                .sign_up(&email, password, Some(&profile.full_name))
                                .await
                            {
                                Ok(user) => current = Some(user),
                                Err(sign_up_err) => {
                                    debug!(
                                        event = "login.migration_signup_failed",
                                        domain = "login",
                                        error = %sign_up_err
                                    );
                                }
                            }
                        }
                    }
                }
            } else {
                current = hosted_user;
            }
        }

        let Some(user) = current else { return };
        if profile.auth_id == Some(user.id) {
            return;
        }
        match self.profiles.link_auth_id(profile.id, user.id).await {
            Ok(()) => {
                profile.auth_id = Some(user.id);
                info!(
                    event = "login.migrated",
                    domain = "login",
                    profile_id = %profile.id,
                    auth_id = %user.id
                );
            }
            Err(err) => {
                debug!(event = "login.migration_link_failed", domain = "login", error = %err);
            }
        }
    }
}
