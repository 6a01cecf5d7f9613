//! # Identity collaborator
//! Identity is someone else's product. The app consumes the signed-in user as
//! a value (fed through `Session::on_auth_change`) and hands signup payloads
//! to whatever implements [`IdentityService`]. [`MemoryIdentity`] stands in
//! for the provider in tests.

use std::cell::RefCell;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
        }
    }

    /// The name shown on content this user creates: the display name when the
    /// provider has one, otherwise the local part of the email.
    pub fn handle(&self) -> &str {
        if let Some(name) = self.display_name.as_deref() {
            return name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("email already in use")]
    EmailInUse,
    #[error("{0}")]
    Provider(String),
}

#[allow(async_fn_in_trait)]
pub trait IdentityService {
    async fn create_user(&self, email: &str, password: &str) -> Result<User, IdentityError>;
}

/// In-memory identity provider for tests.
#[derive(Default)]
pub struct MemoryIdentity {
    users: RefCell<Vec<User>>,
    fail_next: RefCell<Option<IdentityError>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, error: IdentityError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    pub fn user_count(&self) -> usize {
        self.users.borrow().len()
    }
}

impl IdentityService for MemoryIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<User, IdentityError> {
        let _ = password; // the stub stores no credentials
        if let Some(error) = self.fail_next.borrow_mut().take() {
            return Err(error);
        }
        if self.users.borrow().iter().any(|u| u.email == email) {
            return Err(IdentityError::EmailInUse);
        }
        let user = User::new(uuid::Uuid::new_v4().to_string(), email);
        self.users.borrow_mut().push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn handle_falls_back_to_the_email_local_part() {
        let mut user = User::new("u1", "ada@example.com");
        assert_eq!(user.handle(), "ada");
        user.display_name = Some("Ada".to_string());
        assert_eq!(user.handle(), "Ada");
    }

    #[test]
    fn duplicate_emails_are_rejected() {
        let identity = MemoryIdentity::new();
        block_on(identity.create_user("ada@example.com", "hunter22")).unwrap();
        let err = block_on(identity.create_user("ada@example.com", "hunter22")).unwrap_err();
        assert_eq!(err, IdentityError::EmailInUse);
        assert_eq!(identity.user_count(), 1);
    }
}
