//! Domain types and models

pub mod reference;
pub mod task;
pub mod timeline;
pub mod user;

pub use reference::{Activity, Project};
pub use task::{NewTask, Task};
pub use timeline::TimelineBlock;
pub use user::{AuthCredential, UserProfile};
