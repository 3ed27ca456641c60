pub mod error;
pub mod filter;
pub mod invocation;
pub mod target;
pub mod task;

pub use error::{CoreError, CoreErrorKind, CoreResult};
pub use filter::OperatorFilter;
pub use invocation::{ArgumentDescriptor, ArgumentSignature, InvocationRecord};
pub use target::{Target, TargetPair};
pub use task::{Task, TaskRequest};
