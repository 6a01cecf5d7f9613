//! # New post form
//! Tabbed composer: text inputs keyed by name, an optionally staged image
//! (the host's media pipeline turns a picked file into a data URL and hands
//! it to us; what happens to it at submit time is that pipeline's concern).
//! Submitting builds the post document and writes it through the session.

use chrono::Utc;

use ledger::DocumentStore;

use crate::post::Post;
use crate::Session;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormTab {
    #[default]
    Post,
    ImagesAndVideo,
    Link,
    Talk,
}

impl FormTab {
    pub const ALL: [FormTab; 4] = [
        FormTab::Post,
        FormTab::ImagesAndVideo,
        FormTab::Link,
        FormTab::Talk,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FormTab::Post => "Post",
            FormTab::ImagesAndVideo => "Images & Video",
            FormTab::Link => "Link",
            FormTab::Talk => "Talk",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewPostForm {
    selected_tab: FormTab,
    title: String,
    body: String,
    selected_file: Option<String>,
    error: Option<String>,
    loading: bool,
}

impl NewPostForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_tab(&self) -> FormTab {
        self.selected_tab
    }

    pub fn select_tab(&mut self, tab: FormTab) {
        self.selected_tab = tab;
    }

    /// Update one text input by its name.
    pub fn on_text_change(&mut self, name: &str, value: &str) {
        match name {
            "title" => self.title = value.to_string(),
            "body" => self.body = value.to_string(),
            _ => log::debug!("ignoring unknown post field {name:?}"),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Stage a picked image as a data URL.
    pub fn select_image(&mut self, data_url: impl Into<String>) {
        self.selected_file = Some(data_url.into());
    }

    pub fn clear_image(&mut self) {
        self.selected_file = None;
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Build the post document and write it. On success the text inputs are
    /// reset and the created post is returned so the host can navigate to it;
    /// on failure the message lands in the form's error state and the inputs
    /// are kept for another try.
    pub async fn create_post<S: DocumentStore>(
        &mut self,
        session: &Session<S>,
        community_id: &str,
    ) -> Option<Post> {
        if self.loading {
            return None;
        }
        self.error = None;

        let Some(user) = session.current_user() else {
            self.error = Some("you must be signed in to post".to_string());
            return None;
        };
        if self.title.trim().is_empty() {
            self.error = Some("a title is required".to_string());
            return None;
        }

        self.loading = true;
        let post = Post {
            id: uuid::Uuid::new_v4().to_string(),
            community_id: community_id.to_string(),
            creator_id: user.uid.clone(),
            creator_display_name: user.handle().to_string(),
            title: self.title.clone(),
            body: self.body.clone(),
            number_of_comments: 0,
            vote_status: 0,
            // the media pipeline uploads the staged file and patches the URL in
            image_url: None,
            created_at: Utc::now(),
        };
        let result = session.write_post(&post).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.title.clear();
                self.body.clear();
                self.selected_file = None;
                Some(post)
            }
            Err(error) => {
                log::error!("create_post failed in {community_id}: {error}");
                self.error = Some("error creating post".to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post_data::post_path;
    use crate::testing::{FailingStore, signed_in_session, user};
    use futures::executor::block_on;
    use ledger::model::DocPath;

    fn filled_form() -> NewPostForm {
        let mut form = NewPostForm::new();
        form.on_text_change("title", "first post");
        form.on_text_change("body", "hello agora");
        form
    }

    #[test]
    fn tab_selection_defaults_to_post() {
        let mut form = NewPostForm::new();
        assert_eq!(form.selected_tab(), FormTab::Post);
        form.select_tab(FormTab::Link);
        assert_eq!(form.selected_tab(), FormTab::Link);
        assert_eq!(FormTab::ImagesAndVideo.title(), "Images & Video");
    }

    #[test]
    fn create_post_writes_the_document_and_resets_the_form() {
        let session = signed_in_session(user("u1"));
        let mut form = filled_form();
        form.select_image("data:image/png;base64,AAAA");

        let post = block_on(form.create_post(&session, "c1")).unwrap();
        assert_eq!(post.creator_id, "u1");
        assert_eq!(post.creator_display_name, "u1");
        assert_eq!(post.community_id, "c1");
        assert_eq!(post.vote_status, 0);
        assert!(session.store().contains(&post_path(&post.id).unwrap()));

        assert_eq!(form.title(), "");
        assert_eq!(form.body(), "");
        assert_eq!(form.selected_file(), None);
        assert_eq!(form.error(), None);
    }

    #[test]
    fn the_stored_document_round_trips() {
        let session = signed_in_session(user("u1"));
        let mut form = filled_form();
        let post = block_on(form.create_post(&session, "c1")).unwrap();

        block_on(session.fetch_post(&post.id));
        let selected = session.state().posts.get().selected_post.unwrap();
        assert_eq!(selected.title, "first post");
        assert_eq!(selected.body, "hello agora");
    }

    #[test]
    fn a_title_is_required() {
        let session = signed_in_session(user("u1"));
        let mut form = NewPostForm::new();
        form.on_text_change("title", "   ");
        form.on_text_change("body", "text");

        assert!(block_on(form.create_post(&session, "c1")).is_none());
        assert_eq!(form.error(), Some("a title is required"));
        assert_eq!(session.store().write_count(), 0);
    }

    #[test]
    fn posting_requires_a_user() {
        let session = crate::Session::new(ledger::memory::MemoryStore::new());
        let mut form = filled_form();
        assert!(block_on(form.create_post(&session, "c1")).is_none());
        assert_eq!(form.error(), Some("you must be signed in to post"));
    }

    #[test]
    fn a_failed_write_keeps_the_inputs() {
        let session = crate::Session::new(FailingStore);
        block_on(session.on_auth_change(Some(user("u1"))));
        let mut form = filled_form();

        assert!(block_on(form.create_post(&session, "c1")).is_none());
        assert_eq!(form.error(), Some("error creating post"));
        assert_eq!(form.title(), "first post");
        assert!(!form.loading());
    }

    #[test]
    fn post_ids_are_unique() {
        let session = signed_in_session(user("u1"));
        let a = block_on(filled_form().create_post(&session, "c1")).unwrap();
        let b = block_on(filled_form().create_post(&session, "c1")).unwrap();
        assert_ne!(a.id, b.id);
        let _: DocPath = post_path(&a.id).unwrap();
    }
}
