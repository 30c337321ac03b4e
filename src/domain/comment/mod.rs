mod comment_content;
mod image_url;
mod types;

pub use comment_content::CommentContent;
pub use image_url::ImageUrl;
pub use types::*;

/// Validated body of a new comment. Emptiness is checked by the caller so it
/// can be reported separately from malformed input.
#[derive(Debug)]
pub struct CommentBody {
    pub content: CommentContent,
    pub image: Option<ImageUrl>,
}

impl CommentBody {
    pub fn parse(content: Option<String>, image_url: Option<String>) -> Result<Self, String> {
        Ok(Self {
            content: CommentContent::parse(content.unwrap_or_default())?,
            image: ImageUrl::parse_optional(image_url)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.image.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageChange {
    Keep,
    Clear,
    Replace(ImageUrl),
}

/// Validated edit. `None` content keeps the stored text.
#[derive(Debug)]
pub struct CommentEdit {
    pub content: Option<CommentContent>,
    pub image: ImageChange,
}

impl CommentEdit {
    pub fn parse(content: Option<String>, image_url: Option<String>) -> Result<Self, String> {
        let content = content.map(CommentContent::parse).transpose()?;
        let image = match image_url {
            None => ImageChange::Keep,
            Some(url) => match ImageUrl::parse_optional(Some(url))? {
                Some(url) => ImageChange::Replace(url),
                None => ImageChange::Clear,
            },
        };

        Ok(Self { content, image })
    }

    /// Computes the stored fields after applying this edit.
    pub fn apply(self, current: &CommentRecord) -> (String, Option<String>) {
        let content = match self.content {
            Some(content) => content.into_inner(),
            None => current.content.clone(),
        };
        let image_url = match self.image {
            ImageChange::Keep => current.image_url.clone(),
            ImageChange::Clear => None,
            ImageChange::Replace(url) => Some(url.into_inner()),
        };
        (content, image_url)
    }
}
