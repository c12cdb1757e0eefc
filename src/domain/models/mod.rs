mod action;
mod chat_api;
mod chat_mode;
mod conversation;
mod event;
mod form;
mod loading;
mod message;
mod palette;
mod role;
mod session;
mod session_store;
mod snapshot;
mod textarea;
mod view;

pub use action::*;
pub use chat_api::*;
pub use chat_mode::*;
pub use conversation::*;
pub use event::*;
pub use form::*;
pub use loading::*;
pub use message::*;
pub use palette::*;
pub use role::*;
pub use session::*;
pub use session_store::*;
pub use snapshot::*;
pub use textarea::*;
pub use view::*;
