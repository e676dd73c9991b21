//! Session lifecycle and inbound-event dispatch for remote debugging sessions.
//!
//! - [`queue`]: start-gated FIFO delivery of inbound events to one listener.
//! - [`session`]: PIN / QuickConnect authorization state machine and the
//!   phase → destination resolver.
//! - [`trigger`]: hidden key combination that toggles a session.

pub mod config;
pub mod console;
pub mod event;
pub mod queue;
pub mod session;
pub mod state;
pub mod trigger;

pub use event::AssuranceEvent;
pub use queue::{EventListener, InboundEventQueue};
