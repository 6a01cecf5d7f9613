//! # Paths
//! A path alternates collection and document-id segments: `communities` is a
//! collection, `communities/c1` is a document, `users/u1/communitySnippets` is
//! a subcollection under a document. Rendered paths are what backends key on,
//! so segment shape is validated at construction and malformed namespaces can
//! never reach a backend.

use crate::StoreError;

/// A single document id. Non-empty and `/`-free.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Result<Self, StoreError> {
        let id = id.into();
        check_segment(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A (sub)collection: an odd number of valid segments.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    pub fn new<I, S>(segments: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.len() % 2 == 0 {
            return Err(StoreError::InvalidPath(format!(
                "collection paths have an odd number of segments, got {}",
                segments.len()
            )));
        }
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(Self { segments })
    }

    pub fn parse(path: &str) -> Result<Self, StoreError> {
        Self::new(path.split('/'))
    }

    pub fn doc(&self, id: DocId) -> DocPath {
        DocPath {
            collection: self.clone(),
            id,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// A document location: a collection plus an id within it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocPath {
    collection: CollectionPath,
    id: DocId,
}

impl DocPath {
    pub fn parse(path: &str) -> Result<Self, StoreError> {
        let Some((collection, id)) = path.rsplit_once('/') else {
            return Err(StoreError::InvalidPath(format!(
                "document paths have at least two segments, got {path:?}"
            )));
        };
        Ok(CollectionPath::parse(collection)?.doc(DocId::new(id)?))
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &DocId {
        &self.id
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

// Paths cross the wire in rendered form.
impl serde::Serialize for DocPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for DocPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Self::parse(&path).map_err(serde::de::Error::custom)
    }
}

fn check_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty() || segment.contains('/') {
        return Err(StoreError::InvalidPath(format!(
            "bad path segment: {segment:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collections_have_an_odd_number_of_segments() {
        assert!(CollectionPath::new(["communities"]).is_ok());
        assert!(CollectionPath::new(["users", "u1", "communitySnippets"]).is_ok());
        assert!(CollectionPath::new(["users", "u1"]).is_err());
        assert!(CollectionPath::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn segments_must_be_nonempty_and_slash_free() {
        assert!(CollectionPath::new(["users", "", "communitySnippets"]).is_err());
        assert!(DocId::new("").is_err());
        assert!(DocId::new("a/b").is_err());
    }

    #[test]
    fn rendering_and_parsing_round_trip() {
        let path = CollectionPath::new(["users", "u1", "communitySnippets"])
            .unwrap()
            .doc(DocId::new("c1").unwrap());
        assert_eq!(path.to_string(), "users/u1/communitySnippets/c1");
        assert_eq!(DocPath::parse("users/u1/communitySnippets/c1").unwrap(), path);
    }

    #[test]
    fn parsing_rejects_collection_shaped_paths() {
        // an even total segment count is a document, an odd one a collection
        assert!(DocPath::parse("communities").is_err());
        assert!(DocPath::parse("users/u1/communitySnippets").is_err());
        assert!(CollectionPath::parse("communities/c1").is_err());
    }
}
