use url::Url;

const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl(String);

impl ImageUrl {
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Invalid image URL: cannot be empty.".to_string());
        }

        if trimmed.len() > MAX_URL_LENGTH {
            return Err(format!(
                "Invalid image URL: cannot be longer than {MAX_URL_LENGTH} characters."
            ));
        }

        // The URL parser silently percent-encodes these, reject them up front
        let forbidden_chars = ['\0', '\n', '\r', '\t', ' '];
        if trimmed.chars().any(|c| forbidden_chars.contains(&c)) {
            return Err("Invalid image URL: contains forbidden characters.".to_string());
        }

        let url = Url::parse(trimmed)
            .map_err(|_| "Invalid image URL: must be an absolute URL.".to_string())?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err("Invalid image URL: must be a valid HTTP or HTTPS URL.".to_string());
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Blank input means "no image".
    pub fn parse_optional(s: Option<String>) -> Result<Option<Self>, String> {
        match s {
            Some(s) if !s.trim().is_empty() => Self::parse(s).map(Some),
            _ => Ok(None),
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ImageUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
