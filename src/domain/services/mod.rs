pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod chat_client;
mod chat_thread;
mod conversation_list;
pub mod events;
mod scroll;
mod session_manager;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use chat_client::*;
pub use chat_thread::*;
pub use conversation_list::*;
pub use scroll::*;
pub use session_manager::*;
