mod comments;
mod health_check;
mod notifications;

pub use comments::*;
pub use health_check::*;
pub use notifications::*;
