pub mod errors;
pub mod extract;
pub mod response;
pub mod session;

pub use errors::{normalize_errors, panic_response};
pub use extract::{ValidatedJson, ValidatedQuery};
pub use response::{ApiResponse, ApiResult};
pub use session::require_session;
