//! User profile lookups and updates.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::error::Error;
use crate::domain::ports::user_store::UserStore;
use crate::domain::user::{User, UserId, UserPatch};

/// Profile reads and writes for registered users.
#[derive(Clone)]
pub struct UsersService {
    users: Arc<dyn UserStore>,
}

impl UsersService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn get(&self, id: UserId) -> Result<User, Error> {
        self.users
            .fetch(id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, Error> {
        self.users
            .fetch_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    pub async fn list(&self) -> Result<Vec<User>, Error> {
        Ok(self.users.list().await?)
    }

    /// Apply a partial profile update, re-checking uniqueness when the
    /// email or username changes.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, Error> {
        if patch.is_empty() {
            return Err(Error::invalid_request("No fields to update"));
        }
        let mut user = self.get(id).await?;

        if let Some(email) = &patch.email {
            if *email != user.email {
                if let Some(other) = self.users.fetch_by_email(email).await? {
                    if other.id != id {
                        return Err(Error::conflict("Email already exists"));
                    }
                }
            }
        }
        if let Some(username) = &patch.username {
            if *username != user.username {
                if let Some(other) = self.users.fetch_by_username(username).await? {
                    if other.id != id {
                        return Err(Error::conflict("Username already exists"));
                    }
                }
            }
        }

        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(profile_picture) = patch.profile_picture {
            user.profile_picture = Some(profile_picture);
        }
        user.updated_at = Some(Utc::now());
        self.users.update(&user).await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::user_store::MockUserStore;

    fn stored_user(id: i64, email: &str, username: &str) -> User {
        User {
            id: UserId(id),
            uid: format!("uid-{id}"),
            email: email.into(),
            username: username.into(),
            name: String::new(),
            profile_picture: None,
            created_at: Utc::now(),
            last_login: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn get_reports_missing_user() {
        let mut users = MockUserStore::new();
        users.expect_fetch().returning(|_| Ok(None));
        let service = UsersService::new(Arc::new(users));
        let err = service.get(UserId(1)).await.unwrap_err();
        assert_eq!(err.message, "User not found");
    }

    #[tokio::test]
    async fn update_rejects_empty_patch() {
        let service = UsersService::new(Arc::new(MockUserStore::new()));
        let err = service.update(UserId(1), UserPatch::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn update_rejects_taken_username() {
        let mut users = MockUserStore::new();
        users
            .expect_fetch()
            .returning(|_| Ok(Some(stored_user(1, "a@example.com", "alpha"))));
        users
            .expect_fetch_by_username()
            .returning(|_| Ok(Some(stored_user(2, "b@example.com", "bravo"))));
        let service = UsersService::new(Arc::new(users));
        let err = service
            .update(
                UserId(1),
                UserPatch { username: Some("bravo".into()), ..UserPatch::default() },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Username already exists");
    }

    #[tokio::test]
    async fn update_allows_keeping_own_email() {
        let mut users = MockUserStore::new();
        users
            .expect_fetch()
            .returning(|_| Ok(Some(stored_user(1, "a@example.com", "alpha"))));
        users
            .expect_update()
            .withf(|user| user.name == "Alice" && user.updated_at.is_some())
            .returning(|_| Ok(()));
        let service = UsersService::new(Arc::new(users));
        let user = service
            .update(
                UserId(1),
                UserPatch {
                    email: Some("a@example.com".into()),
                    name: Some("Alice".into()),
                    ..UserPatch::default()
                },
            )
            .await
            .expect("updated");
        assert_eq!(user.name, "Alice");
    }
}
