//! Service-level diffing and the result types built on it.

pub mod changelog;
pub mod model;
pub mod record;
pub mod service_diff;
pub mod suppression;

pub use changelog::{parse_change_log, ChangeLog};
pub use model::{Change, CommitInfo, OperationDelta, ReleaseDelta, ServiceChange};
pub use record::{CommitRecord, ServiceChangeRecord};
pub use service_diff::{diff_service, diff_service_values};
