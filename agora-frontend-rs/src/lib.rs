//! Client core for Agora, a communities-and-posts discussion platform.
//!
//! Persistence, transactions, and identity all belong to hosted services; this
//! crate is the state layer a UI binds to. It holds the typed application
//! state in reactive cells, describes every transition as a pure reducer, and
//! mirrors remote calls into that state through thin sync methods on
//! [`Session`].
//!
//! The flow is always the same: a route change or user action calls a
//! `Session` method, the method talks to the [`ledger::DocumentStore`], and on
//! success (and only on success) the result is dispatched into local state.
//! Failures are caught at the call site, logged, and converted to state; they
//! never unwind into the host.

mod auth;
mod auth_modal;
mod community;
mod community_data;
mod hosted;
mod new_post;
mod post;
mod post_data;
mod router;
mod signup;
mod state;

#[cfg(test)]
mod testing;

pub use auth::{IdentityError, IdentityService, MemoryIdentity, User};
pub use auth_modal::{AuthModalEvent, AuthModalState, AuthModalView};
pub use community::{
    Community, CommunityEvent, CommunityPrivacy, CommunitySnippet, CommunityState,
};
pub use hosted::{hosted_config, hosted_session};
pub use new_post::{FormTab, NewPostForm};
pub use post::{Post, PostEvent, PostState, PostVote};
pub use router::Route;
pub use signup::{SignupError, SignupForm, SignupPayload};
pub use state::{Atom, ListenerKey, Reduce};

use community_data::MembershipStatus;
use ledger::DocumentStore;
use router::RouteCache;

/// The application's shared reactive state. One instance per [`Session`],
/// passed by reference to whoever renders from it; there is no ambient global.
pub struct AppState {
    pub community: Atom<CommunityState>,
    pub posts: Atom<PostState>,
    pub auth_modal: Atom<AuthModalState>,
}

impl AppState {
    fn new() -> Self {
        Self {
            community: Atom::new(CommunityState::default()),
            posts: Atom::new(PostState::default()),
            auth_modal: Atom::new(AuthModalState::default()),
        }
    }
}

/// One signed-in (or signed-out) browsing session against one store.
///
/// All methods take `&self`: state lives in cells and everything runs on the
/// single UI thread. We never hold a cell borrow across an `.await`, which is
/// what guarantees the absence of borrow panics when handlers re-enter.
pub struct Session<S> {
    pub(crate) store: S,
    pub(crate) state: AppState,
    pub(crate) user: Atom<Option<User>>,
    pub(crate) membership: MembershipStatus,
    pub(crate) route_cache: RouteCache,
}

impl<S> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: AppState::new(),
            user: Atom::new(None),
            membership: MembershipStatus::default(),
            route_cache: RouteCache::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.get()
    }

    /// Flush pending cell notifications. Thunks are collected first and run
    /// with no borrow held, because listeners routinely call back into the
    /// cells.
    pub(crate) fn flush_notifications(&self) {
        let mut notifications = self.state.community.drain_due_notifications();
        notifications.extend(self.state.posts.drain_due_notifications());
        notifications.extend(self.state.auth_modal.drain_due_notifications());
        notifications.extend(self.user.drain_due_notifications());
        for notification in notifications {
            notification();
        }
    }
}

/// Flushes cell notifications when dropped. Held at the top of every mutating
/// entry point so listeners run on the way out regardless of the path the
/// function takes.
pub(crate) struct NotifyLater<'a, S> {
    session: &'a Session<S>,
}

impl<'a, S> NotifyLater<'a, S> {
    pub(crate) fn new(session: &'a Session<S>) -> Self {
        Self { session }
    }
}

impl<'a, S> Drop for NotifyLater<'a, S> {
    fn drop(&mut self) {
        self.session.flush_notifications();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::memory::MemoryStore;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn flush_notifies_every_dirty_cell() {
        let session = Session::new(MemoryStore::new());
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        session.state().community.subscribe(move || seen.set(seen.get() + 1));
        let seen = calls.clone();
        session.state().posts.subscribe(move || seen.set(seen.get() + 1));
        let seen = calls.clone();
        session.state().auth_modal.subscribe(move || seen.set(seen.get() + 1));

        session
            .state()
            .community
            .dispatch(&CommunityEvent::SnippetsCleared);
        session.state().posts.dispatch(&PostEvent::SelectionCleared);
        session
            .state()
            .auth_modal
            .dispatch(&AuthModalEvent::Close);
        session.flush_notifications();
        assert_eq!(calls.get(), 3);

        // everything clean again
        session.flush_notifications();
        assert_eq!(calls.get(), 3);
    }
}
