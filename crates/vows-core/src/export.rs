//! CSV export for the admin console.

use crate::error::{VowsError, VowsResult};
use crate::models::user::User;

const USER_HEADER: [&str; 9] = [
    "id",
    "email",
    "name",
    "role",
    "tenant_id",
    "is_test_account",
    "email_opt_in",
    "deleted",
    "created_at",
];

/// Render users as CSV bytes, header first.
pub fn users_csv(users: &[User]) -> VowsResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(USER_HEADER).map_err(csv_error)?;

    for user in users {
        writer
            .write_record([
                user.id.to_string(),
                user.email.clone(),
                user.name.clone(),
                user.role.as_str().to_string(),
                user.tenant_id.to_string(),
                user.is_test_account.to_string(),
                user.email_opt_in.to_string(),
                user.is_deleted().to_string(),
                user.created_at.to_rfc3339(),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| VowsError::Internal(format!("csv flush: {e}")))
}

fn csv_error(e: csv::Error) -> VowsError {
    VowsError::Internal(format!("csv write: {e}"))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::models::user::UserRole;

    fn user(email: &str, name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            role: UserRole::Member,
            is_test_account: false,
            email_opt_in: true,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn header_only_for_empty_input() {
        let bytes = users_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.trim_end(),
            "id,email,name,role,tenant_id,is_test_account,email_opt_in,deleted,created_at"
        );
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let bytes = users_csv(&[user("a@example.com", "Doe, Jane")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("\"Doe, Jane\""));
        assert!(row.contains(",Member,"));
        assert!(row.contains(",false,true,false,"));
    }
}
