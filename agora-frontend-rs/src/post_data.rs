//! # Post sync
//! The selected post mirrors whatever `posts/{id}` the route points at. Fetch
//! failures are logged and leave the slot empty; the page renders nothing for
//! it rather than an error state.

use ledger::model::{CollectionPath, DocId, DocPath, WriteBatch};
use ledger::{DocumentStore, StoreError};

use crate::auth::User;
use crate::post::{Post, PostEvent, PostVote};
use crate::{NotifyLater, Session};

impl<S: DocumentStore> Session<S> {
    /// Load one post into `selected_post`.
    pub async fn fetch_post(&self, post_id: &str) {
        self.load_selected_post(post_id, None).await;
    }

    pub(crate) async fn load_selected_post(&self, post_id: &str, epoch: Option<u64>) {
        let _flush = NotifyLater::new(self);
        match self.try_get_post(post_id).await {
            Ok(Some(post)) => {
                if let Some(epoch) = epoch
                    && !self.route_cache.is_current(epoch)
                {
                    log::debug!("discarding stale post fetch for {post_id}");
                    return;
                }
                self.state.posts.dispatch(&PostEvent::PostSelected(post));
                self.route_cache.set_post_loaded(Some(post_id.to_string()));
            }
            Ok(None) => log::debug!("post {post_id} does not exist"),
            // the slot stays empty; there is deliberately no error state here
            Err(error) => log::error!("fetch_post failed for {post_id}: {error}"),
        }
    }

    /// Delete a post and drop it from local state. Returns whether the delete
    /// landed, so the caller can decide to navigate away.
    pub async fn delete_post(&self, post: &Post) -> bool {
        let _flush = NotifyLater::new(self);
        match self.try_delete_post(post).await {
            Ok(()) => {
                self.state
                    .posts
                    .dispatch(&PostEvent::PostDeleted(post.id.clone()));
                true
            }
            Err(error) => {
                log::error!("delete_post failed for {}: {error}", post.id);
                false
            }
        }
    }

    /// Mirror the signed-in user's vote records for one community into local
    /// state, so the vote controls render with the user's own votes.
    pub async fn get_post_votes(&self, community_id: &str) {
        let Some(user) = self.current_user() else {
            return;
        };
        let _flush = NotifyLater::new(self);
        match self.try_get_post_votes(&user, community_id).await {
            Ok(votes) => self.state.posts.dispatch(&PostEvent::VotesLoaded(votes)),
            Err(error) => log::error!("get_post_votes failed for {community_id}: {error}"),
        }
    }

    pub(crate) async fn write_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.set(post_path(&post.id)?, post)?;
        self.store.commit(batch).await
    }

    async fn try_get_post(&self, post_id: &str) -> Result<Option<Post>, StoreError> {
        let Some(doc) = self.store.get_doc(&post_path(post_id)?).await? else {
            return Ok(None);
        };
        Ok(Some(doc.decode()?))
    }

    async fn try_delete_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch.delete(post_path(&post.id)?);
        self.store.commit(batch).await
    }

    async fn try_get_post_votes(
        &self,
        user: &User,
        community_id: &str,
    ) -> Result<im::Vector<PostVote>, StoreError> {
        // the store lists whole namespaces; the per-community cut is ours
        let docs = self
            .store
            .list_collection(&post_votes_collection(&user.uid)?)
            .await?;
        let votes: Vec<PostVote> = docs
            .iter()
            .map(|doc| doc.decode())
            .collect::<Result<_, _>>()?;
        Ok(votes
            .into_iter()
            .filter(|vote| vote.community_id == community_id)
            .collect())
    }
}

pub(crate) fn post_path(post_id: &str) -> Result<DocPath, StoreError> {
    Ok(CollectionPath::new(["posts"])?.doc(DocId::new(post_id)?))
}

fn post_votes_collection(uid: &str) -> Result<CollectionPath, StoreError> {
    CollectionPath::new(["users", uid, "postVotes"])
}
