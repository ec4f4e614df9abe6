//! Account signup, sign-in and token resolution.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::error::Error;
use crate::domain::ids::{EntityKind, IdAllocator};
use crate::domain::password::{self, PasswordContext};
use crate::domain::ports::auth_provider::AuthProvider;
use crate::domain::ports::user_store::UserStore;
use crate::domain::user::{User, UserId};

/// Result of a successful signup or sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Orchestrates account creation and authentication.
///
/// Credential handling lives in the external auth provider; this service
/// owns the profile record and the local uniqueness rules layered on top.
#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AuthProvider>,
    users: Arc<dyn UserStore>,
    ids: IdAllocator,
}

impl AccountService {
    pub fn new(auth: Arc<dyn AuthProvider>, users: Arc<dyn UserStore>, ids: IdAllocator) -> Self {
        Self { auth, users, ids }
    }

    /// Register a new account.
    ///
    /// Local checks run before the provider is contacted so a rejected
    /// request never leaves a dangling provider account.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        username: &str,
        name: &str,
    ) -> Result<Session, Error> {
        if email.is_empty() || password.is_empty() {
            return Err(Error::invalid_request("Email and password are required"));
        }
        password::validate(password, &PasswordContext { username, email })
            .map_err(|rejection| Error::invalid_request(rejection.message))?;

        if self.users.fetch_by_email(email).await?.is_some() {
            return Err(Error::conflict("Email already exists"));
        }
        if !username.is_empty() && self.users.fetch_by_username(username).await?.is_some() {
            return Err(Error::conflict("Username already exists"));
        }

        let account = self.auth.create_account(email, password).await?;
        let id = UserId(self.ids.next_id(EntityKind::Users).await?);
        let now = Utc::now();
        let user = User {
            id,
            uid: account.uid,
            email: email.to_owned(),
            username: username.to_owned(),
            name: name.to_owned(),
            profile_picture: None,
            created_at: now,
            last_login: Some(now),
            updated_at: None,
        };
        self.users.insert(&user).await?;
        info!(user_id = %id, "account created");
        Ok(Session {
            user,
            token: account.token,
        })
    }

    /// Authenticate with email and password, stamping the last login time.
    pub async fn signin(&self, email: &str, password: &str) -> Result<Session, Error> {
        if email.is_empty() || password.is_empty() {
            return Err(Error::invalid_request("Email and password are required"));
        }
        let account = self.auth.sign_in(email, password).await?;
        let mut user = self
            .users
            .fetch_by_email(email)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;
        user.last_login = Some(Utc::now());
        self.users.update(&user).await?;
        info!(user_id = %user.id, "signed in");
        Ok(Session {
            user,
            token: account.token,
        })
    }

    /// Resolve a bearer token to the local user it authenticates.
    pub async fn resolve_token(&self, token: &str) -> Result<User, Error> {
        let uid = self.auth.verify_token(token).await?;
        self.users
            .fetch_by_uid(&uid)
            .await?
            .ok_or_else(|| Error::unauthorized("Invalid or expired token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::auth_provider::{AuthAccount, AuthProviderError, MockAuthProvider};
    use crate::domain::ports::counter_store::MockCounterStore;
    use crate::domain::ports::user_store::MockUserStore;

    fn allocator_returning(id: i64) -> IdAllocator {
        let mut counters = MockCounterStore::new();
        counters.expect_increment().returning(move |_| Ok(id));
        IdAllocator::new(Arc::new(counters))
    }

    fn existing_user() -> User {
        User {
            id: UserId(3),
            uid: "uid-3".into(),
            email: "taken@example.com".into(),
            username: "taken".into(),
            name: String::new(),
            profile_picture: None,
            created_at: Utc::now(),
            last_login: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn signup_allocates_id_and_persists_profile() {
        let mut auth = MockAuthProvider::new();
        auth.expect_create_account().returning(|_, _| {
            Ok(AuthAccount {
                uid: "uid-9".into(),
                token: "tok".into(),
            })
        });
        let mut users = MockUserStore::new();
        users.expect_fetch_by_email().returning(|_| Ok(None));
        users.expect_fetch_by_username().returning(|_| Ok(None));
        users
            .expect_insert()
            .withf(|user| user.id == UserId(9) && user.uid == "uid-9" && user.last_login.is_some())
            .returning(|_| Ok(()));

        let service =
            AccountService::new(Arc::new(auth), Arc::new(users), allocator_returning(9));
        let session = service
            .signup("new@example.com", "sunny4hounds", "newbie", "New B")
            .await
            .expect("signup succeeds");
        assert_eq!(session.user.id, UserId(9));
        assert_eq!(session.token, "tok");
    }

    #[tokio::test]
    async fn signup_rejects_missing_credentials() {
        let service = AccountService::new(
            Arc::new(MockAuthProvider::new()),
            Arc::new(MockUserStore::new()),
            allocator_returning(1),
        );
        let err = service.signup("", "pw", "u", "n").await.unwrap_err();
        assert_eq!(err.message, "Email and password are required");
    }

    #[tokio::test]
    async fn signup_rejects_weak_password_before_provider_call() {
        // No expectations on the provider: reaching it would fail the test.
        let mut users = MockUserStore::new();
        users.expect_fetch_by_email().never();
        let service = AccountService::new(
            Arc::new(MockAuthProvider::new()),
            Arc::new(users),
            allocator_returning(1),
        );
        let err = service
            .signup("a@example.com", "password123", "user", "Name")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "Password is too common");
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let mut users = MockUserStore::new();
        users
            .expect_fetch_by_email()
            .returning(|_| Ok(Some(existing_user())));
        let service = AccountService::new(
            Arc::new(MockAuthProvider::new()),
            Arc::new(users),
            allocator_returning(1),
        );
        let err = service
            .signup("taken@example.com", "sunny4hounds", "other", "Name")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Email already exists");
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_username() {
        let mut users = MockUserStore::new();
        users.expect_fetch_by_email().returning(|_| Ok(None));
        users
            .expect_fetch_by_username()
            .returning(|_| Ok(Some(existing_user())));
        let service = AccountService::new(
            Arc::new(MockAuthProvider::new()),
            Arc::new(users),
            allocator_returning(1),
        );
        let err = service
            .signup("fresh@example.com", "sunny4hounds", "taken", "Name")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Username already exists");
    }

    #[tokio::test]
    async fn signin_maps_provider_rejection() {
        let mut auth = MockAuthProvider::new();
        auth.expect_sign_in()
            .returning(|_, _| Err(AuthProviderError::InvalidCredentials));
        let service = AccountService::new(
            Arc::new(auth),
            Arc::new(MockUserStore::new()),
            allocator_returning(1),
        );
        let err = service
            .signin("a@example.com", "wrongpass1")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Invalid email or password");
    }

    #[tokio::test]
    async fn signin_stamps_last_login() {
        let mut auth = MockAuthProvider::new();
        auth.expect_sign_in().returning(|_, _| {
            Ok(AuthAccount {
                uid: "uid-3".into(),
                token: "tok".into(),
            })
        });
        let mut users = MockUserStore::new();
        users
            .expect_fetch_by_email()
            .returning(|_| Ok(Some(existing_user())));
        users
            .expect_update()
            .withf(|user| user.last_login.is_some())
            .returning(|_| Ok(()));
        let service =
            AccountService::new(Arc::new(auth), Arc::new(users), allocator_returning(1));
        let session = service
            .signin("taken@example.com", "sunny4hounds")
            .await
            .expect("signin succeeds");
        assert!(session.user.last_login.is_some());
    }

    #[tokio::test]
    async fn resolve_token_requires_known_uid() {
        let mut auth = MockAuthProvider::new();
        auth.expect_verify_token()
            .returning(|_| Ok("uid-unknown".into()));
        let mut users = MockUserStore::new();
        users.expect_fetch_by_uid().returning(|_| Ok(None));
        let service =
            AccountService::new(Arc::new(auth), Arc::new(users), allocator_returning(1));
        let err = service.resolve_token("tok").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
