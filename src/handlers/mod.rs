// Handlers grouped by collection. Access requirements are attached in
// routes.rs, not inside the handlers:
//   public         - no token
//   authenticated  - verified bearer token (require_auth)
//   admin          - verified token + stored admin role (require_auth, require_admin)
pub mod donors;
pub mod requests;
pub mod root;

pub use root::{fallback, health, root};
