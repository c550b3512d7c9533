//! Filter resolution services.
//!
//! Services orchestrate store backends and provide the high-level
//! operations the render pipeline consumes.

mod repository;
mod session;

pub use repository::FilterRepository;
pub use session::ReadingSession;
