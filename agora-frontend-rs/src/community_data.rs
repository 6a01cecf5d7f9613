//! # Membership sync
//! Joining a community is two writes that must land together: create the
//! join-record under the user, bump the community's member counter. Both ride
//! one [`WriteBatch`] and the backend applies it atomically, so local state is
//! only touched after the commit resolves; there is nothing to roll back on
//! failure because nothing was applied.
//!
//! Leave is the symmetric batch. Both paths are gated behind authentication
//! (the unauthenticated signal is an auth-modal open, not an error) and behind
//! the in-flight flag, which is how the UI disables the control while a
//! request is outstanding.

use std::cell::{Cell, RefCell};

use ledger::model::{CollectionPath, DocId, DocPath, WriteBatch};
use ledger::{DocumentStore, StoreError};

use crate::auth::User;
use crate::auth_modal::{AuthModalEvent, AuthModalView};
use crate::community::{Community, CommunityEvent, CommunitySnippet};
use crate::post::PostEvent;
use crate::{NotifyLater, Session};

/// Join/leave progress, local to the control that triggers it.
#[derive(Default)]
pub(crate) struct MembershipStatus {
    loading: Cell<bool>,
    error: RefCell<Option<String>>,
}

impl MembershipStatus {
    fn loading(&self) -> bool {
        self.loading.get()
    }

    fn begin(&self) {
        self.loading.set(true);
        *self.error.borrow_mut() = None;
    }

    fn finish(&self) {
        self.loading.set(false);
    }

    fn set_error(&self, message: String) {
        *self.error.borrow_mut() = Some(message);
    }

    pub(crate) fn clear_error(&self) {
        *self.error.borrow_mut() = None;
    }

    fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }
}

impl<S: DocumentStore> Session<S> {
    /// True while a join/leave is in flight; the UI disables the control.
    pub fn membership_loading(&self) -> bool {
        self.membership.loading()
    }

    /// The last join/leave failure, for the UI to render. Cleared when a new
    /// attempt starts and on sign-out.
    pub fn membership_error(&self) -> Option<String> {
        self.membership.error()
    }

    /// Entry point for the join/leave control.
    ///
    /// Without a signed-in user this signals the auth modal and performs no
    /// data mutation; with one it dispatches to leave or join. Re-entry while
    /// a request is in flight is a no-op.
    pub async fn on_join_or_leave_community(&self, community: &Community, is_joined: bool) {
        let _flush = NotifyLater::new(self);
        if self.current_user().is_none() {
            self.state
                .auth_modal
                .dispatch(&AuthModalEvent::Open(AuthModalView::LogIn));
            return;
        }
        if self.membership.loading() {
            return;
        }

        if is_joined {
            self.leave_community(&community.id).await;
        } else {
            self.join_community(community).await;
        }
    }

    /// Create the join-record and bump the member counter as one batch. The
    /// snippet lands in local state only after the commit succeeds.
    pub async fn join_community(&self, community: &Community) {
        let Some(user) = self.current_user() else {
            return;
        };
        let _flush = NotifyLater::new(self);
        self.membership.begin();
        match self.try_join(&user, community).await {
            Ok(snippet) => {
                self.state
                    .community
                    .dispatch(&CommunityEvent::SnippetAdded(snippet));
            }
            Err(error) => {
                log::error!("join_community failed for {}: {error}", community.id);
                self.membership.set_error(error.to_string());
            }
        }
        self.membership.finish();
    }

    /// Delete the join-record and decrement the member counter as one batch.
    pub async fn leave_community(&self, community_id: &str) {
        let Some(user) = self.current_user() else {
            return;
        };
        let _flush = NotifyLater::new(self);
        self.membership.begin();
        match self.try_leave(&user, community_id).await {
            Ok(()) => {
                self.state
                    .community
                    .dispatch(&CommunityEvent::SnippetRemoved(community_id.to_string()));
            }
            Err(error) => {
                log::error!("leave_community failed for {community_id}: {error}");
                self.membership.set_error(error.to_string());
            }
        }
        self.membership.finish();
    }

    /// Replace the local snippet set with the user's remote join-records.
    pub async fn get_my_snippets(&self) {
        let Some(user) = self.current_user() else {
            return;
        };
        let _flush = NotifyLater::new(self);
        self.membership.begin();
        match self.try_get_my_snippets(&user).await {
            Ok(snippets) => {
                self.state
                    .community
                    .dispatch(&CommunityEvent::SnippetsLoaded(snippets));
            }
            Err(error) => log::error!("get_my_snippets failed for {}: {error}", user.uid),
        }
        self.membership.finish();
    }

    /// Feed an auth transition in. Sign-out empties the snippet set right
    /// here, with no remote call; sign-in pulls the join-records down. A
    /// non-transition (same uid as before) does nothing.
    pub async fn on_auth_change(&self, user: Option<User>) {
        let _flush = NotifyLater::new(self);
        let previous = self.current_user();
        if previous.as_ref().map(|u| &u.uid) == user.as_ref().map(|u| &u.uid) {
            return;
        }
        let signed_in = user.is_some();
        self.user.update(|_| user);
        if signed_in {
            self.get_my_snippets().await;
        } else {
            self.state
                .community
                .dispatch(&CommunityEvent::SnippetsCleared);
            self.state.posts.dispatch(&PostEvent::VotesCleared);
            self.membership.clear_error();
        }
    }

    /// Load one community into `current_community`.
    pub async fn get_community_data(&self, community_id: &str) {
        self.load_current_community(community_id, None).await;
    }

    pub(crate) async fn load_current_community(&self, community_id: &str, epoch: Option<u64>) {
        let _flush = NotifyLater::new(self);
        match self.try_get_community(community_id).await {
            Ok(Some(community)) => {
                if let Some(epoch) = epoch
                    && !self.route_cache.is_current(epoch)
                {
                    log::debug!("discarding stale community fetch for {community_id}");
                    return;
                }
                self.state
                    .community
                    .dispatch(&CommunityEvent::CurrentCommunityLoaded(community));
                self.route_cache
                    .set_community_loaded(Some(community_id.to_string()));
            }
            // missing documents render as an empty slot, not a crash
            Ok(None) => log::debug!("community {community_id} does not exist"),
            Err(error) => log::error!("get_community_data failed for {community_id}: {error}"),
        }
    }

    async fn try_join(
        &self,
        user: &User,
        community: &Community,
    ) -> Result<CommunitySnippet, StoreError> {
        let snippet = CommunitySnippet {
            community_id: community.id.clone(),
            image_url: community.image_url.clone(),
            is_moderator: user.uid == community.creator_id,
        };
        let mut batch = WriteBatch::new();
        batch.set(snippet_path(&user.uid, &community.id)?, &snippet)?;
        batch.increment(community_path(&community.id)?, "numberOfMembers", 1);
        self.store.commit(batch).await?;
        Ok(snippet)
    }

    async fn try_leave(&self, user: &User, community_id: &str) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(snippet_path(&user.uid, community_id)?);
        batch.increment(community_path(community_id)?, "numberOfMembers", -1);
        self.store.commit(batch).await
    }

    async fn try_get_my_snippets(
        &self,
        user: &User,
    ) -> Result<im::Vector<CommunitySnippet>, StoreError> {
        let docs = self
            .store
            .list_collection(&snippets_collection(&user.uid)?)
            .await?;
        docs.iter().map(|doc| doc.decode()).collect()
    }

    async fn try_get_community(&self, community_id: &str) -> Result<Option<Community>, StoreError> {
        let Some(doc) = self.store.get_doc(&community_path(community_id)?).await? else {
            return Ok(None);
        };
        Ok(Some(doc.decode()?))
    }
}

pub(crate) fn community_path(community_id: &str) -> Result<DocPath, StoreError> {
    Ok(CollectionPath::new(["communities"])?.doc(DocId::new(community_id)?))
}

fn snippets_collection(uid: &str) -> Result<CollectionPath, StoreError> {
    CollectionPath::new(["users", uid, "communitySnippets"])
}

fn snippet_path(uid: &str, community_id: &str) -> Result<DocPath, StoreError> {
    Ok(snippets_collection(uid)?.doc(DocId::new(community_id)?))
}
