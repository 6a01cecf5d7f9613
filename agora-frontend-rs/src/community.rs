//! # Community state
//! Communities are owned by the remote store and cached read-only here. A
//! [`CommunitySnippet`] is the join-record for one (user, community) pair:
//! the record's existence *is* the membership, there is no separate flag.
//! The local snippet set mirrors the user's remote join-records whenever
//! synchronized, and is cleared outright on sign-out.

use chrono::{DateTime, Utc};

use crate::state::Reduce;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunityPrivacy {
    #[default]
    Public,
    Restricted,
    Private,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub creator_id: String,
    pub number_of_members: i64,
    #[serde(default)]
    pub privacy_type: CommunityPrivacy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Join-record for one (user, community) pair, stored under
/// `users/{uid}/communitySnippets/{communityId}`. The image URL is
/// denormalized so membership lists render without a community read.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySnippet {
    pub community_id: String,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_moderator: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommunityState {
    pub my_snippets: im::Vector<CommunitySnippet>,
    pub current_community: Option<Community>,
}

impl CommunityState {
    pub fn is_joined(&self, community_id: &str) -> bool {
        self.my_snippets
            .iter()
            .any(|snippet| snippet.community_id == community_id)
    }
}

#[derive(Clone, Debug)]
pub enum CommunityEvent {
    /// Wholesale replacement from the remote join-records.
    SnippetsLoaded(im::Vector<CommunitySnippet>),
    SnippetAdded(CommunitySnippet),
    /// Removal by community id, the key the leave action has.
    SnippetRemoved(String),
    SnippetsCleared,
    CurrentCommunityLoaded(Community),
    CurrentCommunityCleared,
}

impl Reduce for CommunityState {
    type Event = CommunityEvent;

    fn apply(self, event: &CommunityEvent) -> Self {
        match event {
            CommunityEvent::SnippetsLoaded(snippets) => Self {
                my_snippets: snippets.clone(),
                ..self
            },
            CommunityEvent::SnippetAdded(snippet) => {
                let mut my_snippets = self.my_snippets;
                my_snippets.push_back(snippet.clone());
                Self { my_snippets, ..self }
            }
            CommunityEvent::SnippetRemoved(community_id) => Self {
                my_snippets: self
                    .my_snippets
                    .into_iter()
                    .filter(|snippet| &snippet.community_id != community_id)
                    .collect(),
                ..self
            },
            CommunityEvent::SnippetsCleared => Self {
                my_snippets: im::Vector::new(),
                ..self
            },
            CommunityEvent::CurrentCommunityLoaded(community) => Self {
                current_community: Some(community.clone()),
                ..self
            },
            CommunityEvent::CurrentCommunityCleared => Self {
                current_community: None,
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(community_id: &str) -> CommunitySnippet {
        CommunitySnippet {
            community_id: community_id.to_string(),
            image_url: None,
            is_moderator: false,
        }
    }

    #[test]
    fn add_then_remove_restores_the_set() {
        let initial = CommunityState::default().apply(&CommunityEvent::SnippetAdded(snippet("c1")));
        let state = initial
            .clone()
            .apply(&CommunityEvent::SnippetAdded(snippet("c2")))
            .apply(&CommunityEvent::SnippetRemoved("c2".to_string()));
        assert_eq!(state, initial);
    }

    #[test]
    fn removal_only_touches_the_named_community() {
        let state = CommunityState::default()
            .apply(&CommunityEvent::SnippetAdded(snippet("c1")))
            .apply(&CommunityEvent::SnippetAdded(snippet("c2")))
            .apply(&CommunityEvent::SnippetRemoved("c1".to_string()));
        assert!(!state.is_joined("c1"));
        assert!(state.is_joined("c2"));
    }

    #[test]
    fn clearing_leaves_the_current_community_alone() {
        let community = Community {
            id: "c1".to_string(),
            creator_id: "u1".to_string(),
            number_of_members: 1,
            privacy_type: CommunityPrivacy::Public,
            created_at: None,
            image_url: None,
        };
        let state = CommunityState::default()
            .apply(&CommunityEvent::CurrentCommunityLoaded(community))
            .apply(&CommunityEvent::SnippetAdded(snippet("c1")))
            .apply(&CommunityEvent::SnippetsCleared);
        assert!(state.my_snippets.is_empty());
        assert!(state.current_community.is_some());
    }

    #[test]
    fn documents_use_the_store_field_names() {
        let snippet = CommunitySnippet {
            community_id: "c1".to_string(),
            image_url: Some("img.png".to_string()),
            is_moderator: true,
        };
        let json = serde_json::to_value(&snippet).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "communityId": "c1",
                "imageURL": "img.png",
                "isModerator": true
            })
        );

        let community: Community = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "creatorId": "u1",
            "numberOfMembers": 12,
            "privacyType": "restricted"
        }))
        .unwrap();
        assert_eq!(community.number_of_members, 12);
        assert_eq!(community.privacy_type, CommunityPrivacy::Restricted);
        assert_eq!(community.image_url, None);
    }
}
