//! Forum operations on top of a record store
//!
//! [`ForumService`] reads and mutates posts, comments and votes through a
//! [`RecordStore`](crate::store::RecordStore). Every read returns fresh
//! records; callers reload a [`Thread`] after each mutation.

mod service;
mod thread;

pub use service::ForumService;
pub use thread::Thread;
