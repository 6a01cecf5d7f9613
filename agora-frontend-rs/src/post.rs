//! # Post state
//! Posts are read-only from the sync layer's point of view: vote aggregates
//! and comment counts are adjusted by the backend, we only mirror them. The
//! "selected" post is the one the active route points at.

use chrono::{DateTime, Utc};

use crate::auth::User;
use crate::state::Reduce;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub community_id: String,
    pub creator_id: String,
    pub creator_display_name: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub number_of_comments: i64,
    pub vote_status: i64,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn user_is_creator(&self, user: &User) -> bool {
        self.creator_id == user.uid
    }
}

/// The signed-in user's vote on one post, mirrored from their vote records.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVote {
    pub id: String,
    pub post_id: String,
    pub community_id: String,
    pub vote_value: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostState {
    pub selected_post: Option<Post>,
    pub post_votes: im::Vector<PostVote>,
}

impl PostState {
    /// The signed-in user's vote on `post_id`, if any. `None` renders as the
    /// neutral vote control.
    pub fn user_vote_value(&self, post_id: &str) -> Option<i64> {
        self.post_votes
            .iter()
            .find(|vote| vote.post_id == post_id)
            .map(|vote| vote.vote_value)
    }
}

#[derive(Clone, Debug)]
pub enum PostEvent {
    PostSelected(Post),
    SelectionCleared,
    VotesLoaded(im::Vector<PostVote>),
    VotesCleared,
    /// A post was deleted; drop the selection and any vote for it.
    PostDeleted(String),
}

impl Reduce for PostState {
    type Event = PostEvent;

    fn apply(self, event: &PostEvent) -> Self {
        match event {
            PostEvent::PostSelected(post) => Self {
                selected_post: Some(post.clone()),
                ..self
            },
            PostEvent::SelectionCleared => Self {
                selected_post: None,
                ..self
            },
            PostEvent::VotesLoaded(votes) => Self {
                post_votes: votes.clone(),
                ..self
            },
            PostEvent::VotesCleared => Self {
                post_votes: im::Vector::new(),
                ..self
            },
            PostEvent::PostDeleted(post_id) => Self {
                selected_post: self
                    .selected_post
                    .filter(|post| &post.id != post_id),
                post_votes: self
                    .post_votes
                    .into_iter()
                    .filter(|vote| &vote.post_id != post_id)
                    .collect(),
            },
        }
    }
}
