use std::fmt::{self, Debug, Formatter};

use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum CommentError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid parent comment")]
    InvalidParent,

    #[error("content or image is required")]
    EmptyContent,

    #[error("not authorized to perform this action")]
    Forbidden,

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for CommentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}
