pub mod create;
pub mod list;
pub mod record;
pub mod status;

pub use create::create;
pub use list::{all, latest, list, pending};
pub use record::{assign, delete, get, replace};
pub use status::set_status;
