//! Admin console service. Every operation requires an `Admin` session.

use tracing::info;
use uuid::Uuid;
use vows_auth::Session;
use vows_core::error::{VowsError, VowsResult};
use vows_core::export::users_csv;
use vows_core::models::user::{UpdateUser, User, UserFilter};
use vows_core::repository::{PaginatedResult, Pagination, UserRepository};

const MAX_PAGE_SIZE: u64 = 200;
const EXPORT_BATCH: u64 = 500;

pub struct AdminService<U: UserRepository> {
    user_repo: U,
}

fn require_admin(session: &Session) -> VowsResult<()> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(VowsError::denied("admin role required"))
    }
}

impl<U: UserRepository> AdminService<U> {
    pub fn new(user_repo: U) -> Self {
        Self { user_repo }
    }

    /// Users matching `filter`, newest first.
    pub async fn list_users(
        &self,
        session: &Session,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> VowsResult<PaginatedResult<User>> {
        require_admin(session)?;
        let pagination = Pagination {
            offset: pagination.offset,
            limit: pagination.limit.clamp(1, MAX_PAGE_SIZE),
        };
        self.user_repo.list(filter, pagination).await
    }

    /// Every user matching `filter` as CSV bytes.
    pub async fn export_csv(&self, session: &Session, filter: &UserFilter) -> VowsResult<Vec<u8>> {
        require_admin(session)?;

        let mut users = Vec::new();
        let mut offset = 0;
        loop {
            let batch = self
                .user_repo
                .list(
                    filter,
                    Pagination {
                        offset,
                        limit: EXPORT_BATCH,
                    },
                )
                .await?;
            let fetched = batch.items.len() as u64;
            users.extend(batch.items);
            offset += fetched;
            if fetched < EXPORT_BATCH || offset >= batch.total {
                break;
            }
        }

        info!(admin_id = %session.user_id, rows = users.len(), "exported users");
        users_csv(&users)
    }

    /// Soft-delete a user. Repeating the call leaves the original
    /// deletion timestamp in place.
    pub async fn soft_delete(&self, session: &Session, user_id: Uuid) -> VowsResult<User> {
        require_admin(session)?;
        if user_id == session.user_id {
            return Err(VowsError::validation("admins cannot delete their own account"));
        }

        let user = self.user_repo.soft_delete(user_id).await?;
        info!(admin_id = %session.user_id, %user_id, "user soft-deleted");
        Ok(user)
    }

    pub async fn set_test_account(
        &self,
        session: &Session,
        user_id: Uuid,
        is_test_account: bool,
    ) -> VowsResult<User> {
        require_admin(session)?;
        let user = self
            .user_repo
            .update(
                user_id,
                UpdateUser {
                    is_test_account: Some(is_test_account),
                    ..Default::default()
                },
            )
            .await?;
        info!(admin_id = %session.user_id, %user_id, is_test_account, "test account flag set");
        Ok(user)
    }
}
