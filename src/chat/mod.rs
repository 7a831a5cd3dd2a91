//! Chat front-end - interactive draft/approve workflow over a REPL

mod session;

pub use session::ChatSession;
