pub mod create;
pub mod list;
pub mod role;
pub mod update;

pub use create::create;
pub use list::{list, search};
pub use role::{role_lookup, set_role};
pub use update::{set_status, update};
