//! Domain model: blog entries and the blogs and tags they reference
//!
//! JSON uses camelCase field names. References to other entities go out as
//! id-only objects (`{"id": 3}`); a reference that has no id yet is dropped
//! from the payload instead of being sent half-filled.

use blog_admin_core::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A post in a blog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Base64 image payload
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_content_type: Option<String>,
    #[serde(
        default,
        serialize_with = "reference::serialize_one",
        skip_serializing_if = "reference::is_unset"
    )]
    pub blog: Option<Blog>,
    #[serde(
        default,
        serialize_with = "reference::serialize_many",
        deserialize_with = "null_as_default"
    )]
    pub tags: Vec<Tag>,
}

/// A blog, referenced by entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
}

/// A tag attached to any number of entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub entries: Vec<BlogEntry>,
}

impl Entity for BlogEntry {
    const RESOURCE: &'static str = "api/blog-entries";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_blob(&mut self, name: &str, data: Option<String>, content_type: Option<String>) -> bool {
        match name {
            "image" => {
                self.image = data;
                self.image_content_type = content_type;
                true
            }
            _ => false,
        }
    }
}

impl Entity for Blog {
    const RESOURCE: &'static str = "api/blogs";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Entity for Tag {
    const RESOURCE: &'static str = "api/tags";

    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Blog {
    /// An id-only reference.
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Name for display, falling back to the id.
    pub fn label(&self) -> String {
        label(self.name.as_deref(), self.id)
    }
}

impl Tag {
    /// An id-only reference.
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn label(&self) -> String {
        label(self.name.as_deref(), self.id)
    }
}

impl BlogEntry {
    /// Replace the tags with id-only references, `[3, 5]` → `[{id:3},{id:5}]`.
    pub fn with_tag_ids(mut self, ids: &[i64]) -> Self {
        self.tags = map_id_list(ids);
        self
    }

    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.iter().filter_map(|t| t.id).collect()
    }

    /// Size in bytes of the decoded image, estimated from the base64 length.
    pub fn image_size(&self) -> Option<usize> {
        self.image.as_deref().map(|data| {
            let padding = data.bytes().rev().take_while(|&b| b == b'=').count();
            (data.len() / 4 * 3).saturating_sub(padding)
        })
    }
}

/// Turn selected tag ids into tag references.
pub fn map_id_list(ids: &[i64]) -> Vec<Tag> {
    ids.iter().copied().map(Tag::reference).collect()
}

fn label(name: Option<&str>, id: Option<i64>) -> String {
    match (name, id) {
        (Some(name), _) if !name.is_empty() => name.to_string(),
        (_, Some(id)) => format!("#{}", id),
        _ => String::new(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod reference {
    use super::*;

    #[derive(Serialize)]
    struct IdRef {
        id: i64,
    }

    pub(super) fn is_unset(blog: &Option<Blog>) -> bool {
        blog.as_ref().and_then(|b| b.id).is_none()
    }

    pub(super) fn serialize_one<S: Serializer>(
        blog: &Option<Blog>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        blog.as_ref()
            .and_then(|b| b.id)
            .map(|id| IdRef { id })
            .serialize(serializer)
    }

    pub(super) fn serialize_many<S: Serializer>(
        tags: &[Tag],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let refs: Vec<IdRef> = tags.iter().filter_map(|t| t.id).map(|id| IdRef { id }).collect();
        refs.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_server_entry() {
        let entry: BlogEntry = serde_json::from_value(json!({
            "id": 7,
            "title": "Hello",
            "content": null,
            "date": "2024-03-01T10:30:00Z",
            "imageContentType": "image/png",
            "image": "iVBORw0KGgo=",
            "blog": { "id": 2, "name": "tech", "handle": "tech" },
            "tags": [{ "id": 3, "name": "rust" }]
        }))
        .unwrap();

        assert_eq!(entry.id, Some(7));
        assert_eq!(entry.content, "");
        assert_eq!(entry.image_content_type.as_deref(), Some("image/png"));
        assert_eq!(entry.blog.as_ref().map(Blog::label), Some("tech".into()));
        assert_eq!(entry.tag_ids(), vec![3]);
        assert_eq!(entry.date.map(|d| d.to_rfc3339()), Some("2024-03-01T10:30:00+00:00".into()));
    }

    #[test]
    fn test_references_serialize_as_ids() {
        let entry = BlogEntry {
            title: "T".into(),
            blog: Some(Blog {
                id: Some(2),
                name: Some("tech".into()),
                handle: None,
            }),
            tags: vec![
                Tag {
                    id: Some(3),
                    name: Some("rust".into()),
                    entries: Vec::new(),
                },
                Tag::default(),
            ],
            ..Default::default()
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["blog"], json!({ "id": 2 }));
        assert_eq!(value["tags"], json!([{ "id": 3 }]));
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_reference_without_id_is_dropped() {
        let entry = BlogEntry {
            blog: Some(Blog::default()),
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("blog").is_none());
    }

    #[test]
    fn test_with_tag_ids() {
        let entry = BlogEntry::default().with_tag_ids(&[3, 5]);
        assert_eq!(entry.tags, vec![Tag::reference(3), Tag::reference(5)]);
        assert_eq!(
            serde_json::to_value(&entry.tags[0]).unwrap(),
            json!({ "id": 3, "name": null })
        );
    }

    #[test]
    fn test_set_blob_only_knows_image() {
        let mut entry = BlogEntry::default();
        assert!(entry.set_blob("image", Some("AAAA".into()), Some("image/gif".into())));
        assert_eq!(entry.image.as_deref(), Some("AAAA"));
        assert!(!entry.set_blob("avatar", None, None));
        assert_eq!(entry.image_size(), Some(3));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Tag::reference(4).label(), "#4");
        assert_eq!(Tag::default().label(), "");
    }
}
