//! # Auth modal state
//! The "authentication required" signal is a state transition, not an error:
//! an unauthenticated join/leave dispatches exactly one `Open(LogIn)` and
//! mutates nothing else.

use crate::state::Reduce;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthModalView {
    LogIn,
    SignUp,
    ResetPassword,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthModalState {
    pub open: bool,
    pub view: AuthModalView,
}

impl Default for AuthModalState {
    fn default() -> Self {
        Self {
            open: false,
            view: AuthModalView::LogIn,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthModalEvent {
    Open(AuthModalView),
    Close,
    SwitchView(AuthModalView),
}

impl Reduce for AuthModalState {
    type Event = AuthModalEvent;

    fn apply(self, event: &AuthModalEvent) -> Self {
        match *event {
            AuthModalEvent::Open(view) => Self { open: true, view },
            AuthModalEvent::Close => Self { open: false, ..self },
            AuthModalEvent::SwitchView(view) => Self { view, ..self },
        }
    }
}
