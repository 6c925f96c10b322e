mod transitions;
mod types;

#[cfg(test)]
mod tests;

pub use transitions::InvalidTransition;
pub use types::{Lifecycle, UnitRecord};
