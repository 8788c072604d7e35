//! Application layer: scripted operations and step-through sessions
//!
//! This layer drives the domain tree and owns the visual state between steps.

pub mod error;
pub mod script;
pub mod session;
pub mod view;

pub use error::{ApplicationError, ApplicationResult};
pub use script::{Operation, Script, Step};
pub use session::{Session, StepReport};
pub use view::{NodeView, TreeView};
