//! Domain layer: key codec, read/write sets, conflict detection, history
//! rendering and rich query selectors.

pub mod composite_key;
pub mod conflicts;
pub mod errors;
pub mod history;
pub mod rwset;
pub mod selector;

pub use composite_key::*;
pub use conflicts::*;
pub use errors::*;
pub use history::*;
pub use rwset::*;
pub use selector::*;
