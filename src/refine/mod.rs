//! Draft-Refine Loop - the core workflow
//!
//! An agent persona drafts a post, a critic persona pushes back, and the two
//! alternate over a shared history until the message budget is reached.

mod cancel;
mod events;
mod runner;

pub use cancel::CancelToken;
pub use events::{WorkflowEvent, create_event_channel};
pub use runner::{Phase, RefineRunner};
