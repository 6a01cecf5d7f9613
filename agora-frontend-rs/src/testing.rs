//! Shared test fixtures: a store wrapper that yields to the executor once per
//! call (so tests can interleave in-flight requests), a store that always
//! fails, and a few domain values.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::executor::block_on;
use ledger::memory::MemoryStore;
use ledger::model::{CollectionPath, DocPath, Document, WriteBatch};
use ledger::{DocumentStore, StoreError};

use crate::auth::User;
use crate::community::{Community, CommunityPrivacy};
use crate::Session;

pub(crate) fn user(uid: &str) -> User {
    User::new(uid, format!("{uid}@example.com"))
}

pub(crate) fn community(
    id: &str,
    creator_id: &str,
    number_of_members: i64,
    image_url: Option<&str>,
) -> Community {
    Community {
        id: id.to_string(),
        creator_id: creator_id.to_string(),
        number_of_members,
        privacy_type: CommunityPrivacy::Public,
        created_at: None,
        image_url: image_url.map(str::to_string),
    }
}

pub(crate) fn signed_in_session(user: User) -> Session<MemoryStore> {
    let session = Session::new(MemoryStore::new());
    block_on(session.on_auth_change(Some(user)));
    session
}

/// Suspends exactly once, then completes.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

async fn yield_once() {
    YieldOnce(false).await
}

/// Delegates to an inner store after yielding once, so a concurrently spawned
/// task gets a turn while the "remote" call is in flight.
pub(crate) struct YieldingStore<S> {
    inner: S,
}

impl<S> YieldingStore<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: DocumentStore> DocumentStore for YieldingStore<S> {
    async fn get_doc(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        yield_once().await;
        self.inner.get_doc(path).await
    }

    async fn list_collection(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError> {
        yield_once().await;
        self.inner.list_collection(collection).await
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        yield_once().await;
        self.inner.commit(batch).await
    }
}

/// Every call fails, for exercising the logged-and-swallowed paths.
pub(crate) struct FailingStore;

impl DocumentStore for FailingStore {
    async fn get_doc(&self, _path: &DocPath) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }

    async fn list_collection(
        &self,
        _collection: &CollectionPath,
    ) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }

    async fn commit(&self, _batch: WriteBatch) -> Result<(), StoreError> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }
}
