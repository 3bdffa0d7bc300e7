//! In-memory adapters for tests and single-process embedding.

mod dispatcher;
mod issue;
mod release;

pub use dispatcher::RecordingEventDispatcher;
pub use issue::InMemoryIssueRepository;
pub use release::InMemoryReleaseRepository;
