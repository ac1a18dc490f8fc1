//! Effects declared by the reducer and the handler that runs them
//!
//! The reducer stays pure: it only says which remote call or file read is
//! needed. [`handle_effect`] spawns the work and the resulting action comes
//! back through the runtime's action channel.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use blog_admin_core::{EffectContext, RemoteCall};
use tracing::{info, warn};

use crate::action::Action;
use crate::api::BlogApi;
use crate::model::{Blog, BlogEntry, Tag};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Entries(RemoteCall<BlogEntry>),
    Blogs(RemoteCall<Blog>),
    Tags(RemoteCall<Tag>),
    /// Read an image file and stage it on the edited entry
    ReadImage { path: PathBuf },
}

/// Spawn the task fulfilling `effect`.
pub fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, api: &BlogApi) {
    match effect {
        Effect::Entries(call) => {
            let client = api.entries.clone();
            ctx.spawn(call.name(), async move {
                Action::Entry(client.perform(call).await)
            });
        }
        Effect::Blogs(call) => {
            let client = api.blogs.clone();
            ctx.spawn(call.name(), async move { Action::Blog(client.perform(call).await) });
        }
        Effect::Tags(call) => {
            let client = api.tags.clone();
            ctx.spawn(call.name(), async move { Action::Tag(client.perform(call).await) });
        }
        Effect::ReadImage { path } => {
            ctx.spawn("read_image", read_image(path));
        }
    }
}

/// Read `path` as an image attachment.
pub async fn read_image(path: PathBuf) -> Action {
    let Some(content_type) = image_content_type(&path) else {
        return Action::FormImageDidError(format!("{} is not an image file", path.display()));
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            info!(path = %path.display(), bytes = bytes.len(), "image attached");
            Action::FormImageDidLoad {
                data: STANDARD.encode(&bytes),
                content_type: content_type.to_string(),
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read image");
            Action::FormImageDidError(format!("cannot read {}: {}", path.display(), e))
        }
    }
}

/// MIME type for an image file, judged by extension.
pub fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type(Path::new("a/b.PNG")), Some("image/png"));
        assert_eq!(image_content_type(Path::new("photo.jpeg")), Some("image/jpeg"));
        assert_eq!(image_content_type(Path::new("notes.txt")), None);
        assert_eq!(image_content_type(Path::new("README")), None);
    }

    #[tokio::test]
    async fn test_read_image_encodes_base64() {
        let path = std::env::temp_dir().join(format!("blog-admin-{}.gif", std::process::id()));
        std::fs::write(&path, b"GIF89a").unwrap();

        let action = read_image(path.clone()).await;
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            action,
            Action::FormImageDidLoad {
                data: "R0lGODlh".into(),
                content_type: "image/gif".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_read_missing_image() {
        let action = read_image(PathBuf::from("/definitely/not/here.png")).await;
        assert!(matches!(action, Action::FormImageDidError(msg) if msg.contains("cannot read")));
    }

    #[tokio::test]
    async fn test_read_non_image() {
        let action = read_image(PathBuf::from("Cargo.toml")).await;
        assert!(matches!(action, Action::FormImageDidError(msg) if msg.contains("not an image")));
    }
}
