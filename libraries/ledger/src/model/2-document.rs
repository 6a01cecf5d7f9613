//! # Documents
//! A document is a JSON field map at a [`DocPath`]. The id is part of the
//! path, not the field map; backends hand back id-less maps and typed decoding
//! stitches the id back in, mirroring the hosted store's split between a
//! document's id and its data.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::StoreError;
use crate::model::{DocId, DocPath};

pub type Fields = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    path: DocPath,
    fields: Fields,
}

impl Document {
    pub fn new(path: DocPath, fields: Fields) -> Self {
        Self { path, fields }
    }

    /// Serialize `value` into the field map for `path`. Only JSON objects can
    /// be stored as documents.
    pub fn encode<T: Serialize>(path: DocPath, value: &T) -> Result<Self, StoreError> {
        let serde_json::Value::Object(fields) = serde_json::to_value(value)? else {
            return Err(StoreError::FailedPrecondition(
                "documents must encode to JSON objects".to_string(),
            ));
        };
        Ok(Self { path, fields })
    }

    /// Decode the field map into `T`. If the payload has no `id` field, the
    /// document's own id is injected under that name first.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut fields = self.fields.clone();
        fields
            .entry("id".to_string())
            .or_insert_with(|| serde_json::Value::String(self.path.id().to_string()));
        Ok(serde_json::from_value(serde_json::Value::Object(fields))?)
    }

    pub fn path(&self) -> &DocPath {
        &self.path
    }

    pub fn id(&self) -> &DocId {
        self.path.id()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CollectionPath;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Snippet {
        id: String,
        label: String,
    }

    fn path(id: &str) -> DocPath {
        CollectionPath::new(["snippets"])
            .unwrap()
            .doc(DocId::new(id).unwrap())
    }

    #[test]
    fn decode_injects_the_document_id() {
        let mut fields = Fields::new();
        fields.insert("label".to_string(), "hello".into());
        let doc = Document::new(path("s1"), fields);

        let snippet: Snippet = doc.decode().unwrap();
        assert_eq!(snippet.id, "s1");
        assert_eq!(snippet.label, "hello");
    }

    #[test]
    fn decode_keeps_an_explicit_id_field() {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), "other".into());
        fields.insert("label".to_string(), "hello".into());
        let doc = Document::new(path("s1"), fields);

        let snippet: Snippet = doc.decode().unwrap();
        assert_eq!(snippet.id, "other");
    }

    #[test]
    fn only_objects_encode() {
        assert!(Document::encode(path("s1"), &42).is_err());
    }
}
