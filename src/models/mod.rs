pub mod bookmark;
pub mod category;
pub mod event;
pub mod registration;
pub mod user;

pub use bookmark::BookmarkDetail;
pub use category::{Category, CategoryInput, CategoryPatch};
pub use event::{Event, EventDetail, EventFilter, EventInput, EventPatch, EventStatus};
pub use registration::{MyRegistrationFilter, RegistrationDetail};
pub use user::{User, UserPublic};
