pub mod event;
pub mod storage;
pub mod verdict;

pub use event::UploadEvent;
pub use storage::{FileMoveOperation, ObjectLocation};
pub use verdict::{RoutingDecision, Verdict};
