pub mod bookmarks;
pub mod categories;
pub mod events;
pub mod registrations;

use uuid::Uuid;

/// Who is looking. Threaded explicitly into every query that computes
/// viewer-dependent fields or filters; never derived from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn user_id(self) -> Option<Uuid> {
        match self {
            Viewer::User(id) => Some(id),
            Viewer::Anonymous => None,
        }
    }
}
