pub mod change;
pub mod hook;
pub mod relation;
pub mod settings;
pub mod unit;

pub use change::RelationChangeBatch;
pub use hook::{HookInvocation, HookKind};
pub use relation::RelationId;
pub use settings::{Members, Settings, UnitSettings, Version};
