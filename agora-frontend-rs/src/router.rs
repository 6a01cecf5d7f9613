//! # Routes
//! The router collaborator surfaces the current route's parameters; this
//! module turns them into fetch decisions. The rule is a cache keyed by the
//! routed identifier: fetch when the routed id differs from the id the slot
//! was loaded for, do nothing on unrelated re-renders, invalidate when the id
//! changes.
//!
//! Every navigation also bumps an epoch. An in-flight fetch carries the epoch
//! it started under, and a completion whose epoch is stale is discarded, so
//! navigating away mid-request can never clobber the newer route's state.

use std::cell::{Cell, RefCell};

use ledger::DocumentStore;

use crate::community::CommunityEvent;
use crate::post::PostEvent;
use crate::{NotifyLater, Session};

/// Parameters of the active route.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub community_id: Option<String>,
    pub post_id: Option<String>,
}

impl Route {
    /// Parse the two page shapes that carry parameters:
    /// `/r/{communityId}` and `/r/{communityId}/comments/{postId}`.
    /// Anything else is a parameterless route.
    pub fn parse(path: &str) -> Self {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        if segments.next() != Some("r") {
            return Self::default();
        }
        let Some(community_id) = segments.next() else {
            return Self::default();
        };
        let post_id = match (segments.next(), segments.next()) {
            (Some("comments"), Some(post_id)) => Some(post_id.to_string()),
            _ => None,
        };
        Self {
            community_id: Some(community_id.to_string()),
            post_id,
        }
    }

    pub fn community(community_id: impl Into<String>) -> Self {
        Self {
            community_id: Some(community_id.into()),
            post_id: None,
        }
    }

    pub fn post(community_id: impl Into<String>, post_id: impl Into<String>) -> Self {
        Self {
            community_id: Some(community_id.into()),
            post_id: Some(post_id.into()),
        }
    }
}

/// Which identifiers the current-community and selected-post slots were
/// loaded for, plus the navigation epoch.
#[derive(Default)]
pub(crate) struct RouteCache {
    community_loaded_for: RefCell<Option<String>>,
    post_loaded_for: RefCell<Option<String>>,
    epoch: Cell<u64>,
}

impl RouteCache {
    fn begin_navigation(&self) -> u64 {
        self.epoch.set(self.epoch.get() + 1);
        self.epoch.get()
    }

    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch
    }

    fn community_loaded_for(&self) -> Option<String> {
        self.community_loaded_for.borrow().clone()
    }

    pub(crate) fn set_community_loaded(&self, community_id: Option<String>) {
        *self.community_loaded_for.borrow_mut() = community_id;
    }

    fn post_loaded_for(&self) -> Option<String> {
        self.post_loaded_for.borrow().clone()
    }

    pub(crate) fn set_post_loaded(&self, post_id: Option<String>) {
        *self.post_loaded_for.borrow_mut() = post_id;
    }
}

impl<S: DocumentStore> Session<S> {
    /// Feed a route transition in. Fetches are lazy: a slot already loaded
    /// for the routed id is left alone, and routes without an id leave the
    /// slots as they are (only navigating to a *different* id invalidates).
    pub async fn on_route_change(&self, route: &Route) {
        let _flush = NotifyLater::new(self);
        let epoch = self.route_cache.begin_navigation();

        if let Some(community_id) = &route.community_id
            && self.route_cache.community_loaded_for().as_deref() != Some(community_id.as_str())
        {
            if self.route_cache.community_loaded_for().is_some() {
                self.route_cache.set_community_loaded(None);
                self.state
                    .community
                    .dispatch(&CommunityEvent::CurrentCommunityCleared);
            }
            self.load_current_community(community_id, Some(epoch)).await;
        }

        if let Some(post_id) = &route.post_id
            && self.route_cache.post_loaded_for().as_deref() != Some(post_id.as_str())
        {
            if self.route_cache.post_loaded_for().is_some() {
                self.route_cache.set_post_loaded(None);
                self.state.posts.dispatch(&PostEvent::SelectionCleared);
            }
            self.load_selected_post(post_id, Some(epoch)).await;
        }
    }
}
