pub mod controller;
pub mod drag;
pub mod frame;
pub mod gateway;
pub mod registry;
pub mod testrun;

pub use controller::{GraphController, Notice, NoticeLevel};
pub use drag::{DragAffordances, DragController, DragRegion};
pub use frame::RedrawScheduler;
pub use gateway::{GatewayError, PersistenceGateway, SavePayload, WorkflowId};
pub use registry::{BoundsRegistry, DEFAULT_NODE_SIZE};
