// fastmask-cli/src/commands/mod.rs
pub mod list;
pub mod mutate;
pub mod search;

pub use list::{handle_list, ListArgs};
pub use mutate::{handle_edit, handle_new, handle_state, EditArgs, IdArgs, NewArgs};
pub use search::{handle_search, SearchArgs};
