mod flags;
mod resolver;

pub use flags::FlagStore;
pub use resolver::{resolve, SessionResolver, SessionState};
