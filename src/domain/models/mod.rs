mod action;
mod command;
mod contact;
mod error;
mod event;
mod message;
mod route;

pub use action::*;
pub use command::*;
pub use contact::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use route::*;
