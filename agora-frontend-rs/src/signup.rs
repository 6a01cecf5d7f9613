//! # Signup form
//! Field state keyed by input name, merged one field at a time as the user
//! types. Submission validates the shape of the input (everything present,
//! plausible email, matching passwords) and hands the payload to the identity
//! collaborator; what counts as a valid *account* is the provider's business.

use crate::auth::{IdentityService, User};
use crate::auth_modal::{AuthModalEvent, AuthModalState, AuthModalView};
use crate::state::Atom;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignupError {
    #[error("all fields are required")]
    MissingFields,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// What gets handed to the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupPayload {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    email: String,
    password: String,
    confirm_password: String,
    error: Option<String>,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update one field by its input name. Unknown names are ignored (the
    /// form only knows its own inputs).
    pub fn on_change(&mut self, name: &str, value: &str) {
        match name {
            "email" => self.email = value.to_string(),
            "password" => self.password = value.to_string(),
            "confirmPassword" => self.confirm_password = value.to_string(),
            _ => log::debug!("ignoring unknown signup field {name:?}"),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// The validation/provider failure to render, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validate(&self) -> Result<SignupPayload, SignupError> {
        if self.email.is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(SignupError::MissingFields);
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(SignupError::InvalidEmail),
        }
        if self.password != self.confirm_password {
            return Err(SignupError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SignupError::PasswordTooShort);
        }
        Ok(SignupPayload {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// Validate and hand off to the identity provider. Returns the created
    /// user on success (the host feeds it through `Session::on_auth_change`);
    /// on failure the message lands in the form's error state.
    pub async fn submit<I: IdentityService>(&mut self, identity: &I) -> Option<User> {
        self.error = None;
        let payload = match self.validate() {
            Ok(payload) => payload,
            Err(error) => {
                self.error = Some(error.to_string());
                return None;
            }
        };
        match identity.create_user(&payload.email, &payload.password).await {
            Ok(user) => Some(user),
            Err(error) => {
                log::error!("signup failed: {error}");
                self.error = Some(error.to_string());
                None
            }
        }
    }

    /// "Already have an account? LOG IN"
    pub fn switch_to_log_in(&self, auth_modal: &Atom<AuthModalState>) {
        auth_modal.dispatch(&AuthModalEvent::SwitchView(AuthModalView::LogIn));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{IdentityError, MemoryIdentity};
    use futures::executor::block_on;

    fn filled_form() -> SignupForm {
        let mut form = SignupForm::new();
        form.on_change("email", "ada@example.com");
        form.on_change("password", "hunter2222");
        form.on_change("confirmPassword", "hunter2222");
        form
    }

    #[test]
    fn changes_merge_one_field_at_a_time() {
        let mut form = SignupForm::new();
        form.on_change("email", "ada@example.com");
        form.on_change("password", "hunter2222");
        assert_eq!(form.email(), "ada@example.com");
        // untouched fields keep their values
        form.on_change("email", "ada2@example.com");
        assert_eq!(form.validate(), Err(SignupError::MissingFields));
    }

    #[test]
    fn unknown_input_names_are_ignored() {
        let mut form = filled_form();
        form.on_change("displayName", "Ada");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_shapes() {
        let mut form = filled_form();
        form.on_change("email", "not-an-email");
        assert_eq!(form.validate(), Err(SignupError::InvalidEmail));

        let mut form = filled_form();
        form.on_change("confirmPassword", "hunter3333");
        assert_eq!(form.validate(), Err(SignupError::PasswordMismatch));

        let mut form = filled_form();
        form.on_change("password", "short");
        form.on_change("confirmPassword", "short");
        assert_eq!(form.validate(), Err(SignupError::PasswordTooShort));
    }

    #[test]
    fn submit_hands_off_to_the_identity_provider() {
        let identity = MemoryIdentity::new();
        let mut form = filled_form();
        let user = block_on(form.submit(&identity)).unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(form.error(), None);
        assert_eq!(identity.user_count(), 1);
    }

    #[test]
    fn an_invalid_form_never_reaches_the_provider() {
        let identity = MemoryIdentity::new();
        let mut form = SignupForm::new();
        assert!(block_on(form.submit(&identity)).is_none());
        assert_eq!(form.error(), Some("all fields are required"));
        assert_eq!(identity.user_count(), 0);
    }

    #[test]
    fn provider_failures_land_in_the_error_state() {
        let identity = MemoryIdentity::new();
        identity.fail_next(IdentityError::EmailInUse);
        let mut form = filled_form();
        assert!(block_on(form.submit(&identity)).is_none());
        assert_eq!(form.error(), Some("email already in use"));
    }

    #[test]
    fn the_log_in_link_switches_the_modal_view() {
        let modal = Atom::new(AuthModalState {
            open: true,
            view: AuthModalView::SignUp,
        });
        SignupForm::new().switch_to_log_in(&modal);
        assert_eq!(modal.get().view, AuthModalView::LogIn);
        assert!(modal.get().open);
    }
}
