pub mod operation;
pub mod registry;
pub mod settings;

pub use operation::{Operation, RunCtx};
pub use registry::OperationRegistry;
