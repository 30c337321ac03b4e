use uuid::Uuid;

pub const DEFAULT_DISPLAY_NAME_COLOR: &str = "#000000";

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub display_name_color: Option<String>,
    pub profile_image: Option<String>,
}

/// Author fields copied onto a record when it was written.
#[derive(Debug, Clone, Copy)]
pub struct AuthorSnapshot<'a> {
    pub username: &'a str,
    pub display_name: &'a str,
    pub profile_image: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorView {
    pub username: String,
    pub display_name: String,
    pub display_name_color: String,
    pub profile_image: Option<String>,
}

impl AuthorView {
    pub fn resolve(snapshot: AuthorSnapshot<'_>, live: Option<&UserProfile>) -> Self {
        match live {
            Some(user) => Self {
                username: user.username.clone(),
                display_name: user.display_name.clone(),
                display_name_color: user
                    .display_name_color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DISPLAY_NAME_COLOR.to_string()),
                // a user without a picture keeps whatever the record captured
                profile_image: user
                    .profile_image
                    .clone()
                    .or_else(|| snapshot.profile_image.map(String::from)),
            },
            None => Self {
                username: snapshot.username.to_string(),
                display_name: snapshot.display_name.to_string(),
                display_name_color: DEFAULT_DISPLAY_NAME_COLOR.to_string(),
                profile_image: snapshot.profile_image.map(String::from),
            },
        }
    }
}
