mod notification;
mod routes;

pub use notification::*;
pub use routes::*;
