pub mod admin;
pub mod auth;
pub mod extract;
pub mod response;

pub use admin::require_admin;
pub use auth::{identity, require_auth};
pub use extract::{parse_id, ValidJson};
pub use response::{ApiResponse, ApiResult};
