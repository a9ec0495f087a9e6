pub mod actions;
mod app_state;
mod credentials;
mod events;
mod guard;

pub use app_state::*;
pub use credentials::*;
pub use events::*;
pub use guard::*;
