//! Session authorization state machine shared by the PIN and QuickConnect
//! screens, plus the phase → destination mapping used for navigation.

mod destination;
mod environment;
mod error;
mod handler;
mod pin;
mod quick_connect;
mod state;
mod status;

pub use destination::{Destination, resolve};
pub use environment::Environment;
pub use error::ConnectionError;
pub use handler::{AuthMethod, SessionUiOperationHandler, StatusSender, StatusUpdate};
pub use pin::{PIN_LENGTH, PinEntryState, PinScreenAction, PinScreenController};
pub use quick_connect::{QuickConnectAction, QuickConnectController};
pub use state::{ConnectionMethod, SessionConnectionState, SessionPhase};
pub use status::{StatusScreenAction, StatusScreenController};
