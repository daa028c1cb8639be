//! Authentication service: provider sign-in and session lookup.

use tracing::{error, info, warn};
use uuid::Uuid;
use vows_core::error::{VowsError, VowsResult};
use vows_core::models::planner::CreatePlanner;
use vows_core::models::tenant::CreateTenant;
use vows_core::models::user::{CreateUser, UpdateUser, User, UserRole};
use vows_core::repository::{PageRepository, PlannerRepository, TenantRepository, UserRepository};
use vows_core::template;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token::{self, Session};

const DEFAULT_PLANNER_TITLE: &str = "Our Wedding";

/// Identity asserted by the provider callback.
#[derive(Debug)]
pub struct SignInInput {
    pub email: String,
    pub name: Option<String>,
}

/// Successful sign-in result.
#[derive(Debug)]
pub struct SignInOutput {
    /// Signed JWT session token.
    pub token: String,
    pub user: User,
    /// True when this sign-in provisioned a new account.
    pub created: bool,
    /// Session token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U, T, P, G>
where
    U: UserRepository,
    T: TenantRepository,
    P: PlannerRepository,
    G: PageRepository,
{
    user_repo: U,
    tenant_repo: T,
    planner_repo: P,
    page_repo: G,
    config: AuthConfig,
}

impl<U, T, P, G> AuthService<U, T, P, G>
where
    U: UserRepository,
    T: TenantRepository,
    P: PlannerRepository,
    G: PageRepository,
{
    pub fn new(user_repo: U, tenant_repo: T, planner_repo: P, page_repo: G, config: AuthConfig) -> Self {
        Self {
            user_repo,
            tenant_repo,
            planner_repo,
            page_repo,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Reject provider callbacks that do not carry the shared secret.
    pub fn check_provider_secret(&self, presented: Option<&str>) -> VowsResult<()> {
        match presented {
            Some(secret) if token::verify_provider_secret(secret, &self.config) => Ok(()),
            _ => Err(AuthError::InvalidProviderSecret.into()),
        }
    }

    /// Sign in a provider-authenticated user, provisioning a tenant,
    /// its planner and the user on first sign-in.
    pub async fn sign_in(&self, input: SignInInput) -> VowsResult<SignInOutput> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AuthError::MissingEmail.into());
        }

        let (user, created) = match self.user_repo.get_by_email(&email).await {
            Ok(user) if user.is_deleted() => return Err(AuthError::AccountDeleted.into()),
            Ok(user) => (user, false),
            Err(VowsError::NotFound { .. }) => match self.provision(&email, input.name).await {
                Ok(user) => (user, true),
                // Another sign-in provisioned this e-mail first.
                Err(VowsError::AlreadyExists { .. }) => {
                    let user = self.user_repo.get_by_email(&email).await?;
                    if user.is_deleted() {
                        return Err(AuthError::AccountDeleted.into());
                    }
                    (user, false)
                }
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e),
        };

        let token = token::issue_session_token(&user, &self.config)?;
        info!(user_id = %user.id, tenant_id = %user.tenant_id, created, "user signed in");

        Ok(SignInOutput {
            token,
            user,
            created,
            expires_in: self.config.session_lifetime_secs,
        })
    }

    async fn provision(&self, email: &str, name: Option<String>) -> VowsResult<User> {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

        let tenant = self
            .tenant_repo
            .create(CreateTenant {
                name: name.clone(),
                metadata: None,
            })
            .await?;

        match self.populate(tenant.id, email, name).await {
            Ok(user) => Ok(user),
            Err(err) => {
                warn!(tenant_id = %tenant.id, error = %err, "provisioning failed, rolling back");
                if let Err(cleanup) = self.tenant_repo.delete(tenant.id).await {
                    error!(tenant_id = %tenant.id, error = %cleanup, "rollback of provisioned tenant failed");
                }
                Err(err)
            }
        }
    }

    /// Create the user first so a duplicate e-mail fails before any
    /// planner data exists, then the planner and its seed pages.
    async fn populate(&self, tenant_id: Uuid, email: &str, name: String) -> VowsResult<User> {
        let role = if self.config.is_admin_email(email) {
            UserRole::Admin
        } else {
            UserRole::Member
        };

        let user = self
            .user_repo
            .create(CreateUser {
                tenant_id,
                email: email.to_string(),
                name,
                role,
                is_test_account: false,
                email_opt_in: false,
            })
            .await?;

        let planner = self
            .planner_repo
            .create(CreatePlanner {
                tenant_id,
                title: DEFAULT_PLANNER_TITLE.into(),
            })
            .await?;

        for page in template::seed_pages(planner.id) {
            self.page_repo.create(page).await?;
        }

        info!(
            user_id = %user.id,
            %tenant_id,
            planner_id = %planner.id,
            "provisioned new account"
        );
        Ok(user)
    }

    /// Verify a bearer token.
    pub fn authenticate(&self, bearer: &str) -> VowsResult<Session> {
        Ok(token::validate_session_token(bearer, &self.config)?)
    }

    /// The current user behind a session; soft-deleted users are rejected.
    pub async fn current_user(&self, session: &Session) -> VowsResult<User> {
        let user = self.user_repo.get_by_id(session.user_id).await?;
        if user.is_deleted() {
            return Err(AuthError::AccountDeleted.into());
        }
        Ok(user)
    }

    pub async fn set_email_opt_in(&self, session: &Session, email_opt_in: bool) -> VowsResult<User> {
        self.current_user(session).await?;
        self.user_repo
            .update(
                session.user_id,
                UpdateUser {
                    email_opt_in: Some(email_opt_in),
                    ..Default::default()
                },
            )
            .await
    }
}
