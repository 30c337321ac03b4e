use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 500;

/// Trimmed comment text. May be empty: a comment can carry only an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        let grapheme_count = trimmed.graphemes(true).count();

        if grapheme_count > MAX_GRAPHEMES {
            return Err(format!(
                "Invalid comment: cannot exceed {MAX_GRAPHEMES} characters."
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommentContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
