mod author;
mod comment;
mod notification;
mod post;

pub use author::*;
pub use comment::*;
pub use notification::*;
pub use post::*;
