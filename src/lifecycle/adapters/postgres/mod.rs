//! `PostgreSQL` adapters for issue lifecycle persistence.
//!
//! Schema migrations live in the crate's `migrations/` directory.

mod issue_repository;
mod models;
mod release_repository;
mod schema;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub use issue_repository::PostgresIssueRepository;
pub use release_repository::PostgresReleaseRepository;

/// `PostgreSQL` connection pool type shared by lifecycle adapters.
pub type LifecyclePgPool = Pool<ConnectionManager<PgConnection>>;
