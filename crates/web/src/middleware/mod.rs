//! HTTP middleware and session helpers.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (records `request_id` on the span, echoes `x-request-id`)
//! 4. Security headers
//! 5. Session layer (signed cookie, `PostgreSQL` store)
//! 6. Body limit on admin product forms
//!
//! Authentication is enforced per handler with the [`RequireAdminAuth`]
//! extractor rather than a router-wide guard.

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAdminAuth, RequireAdminAuth, current_admin, log_in, log_out};
pub use flash::{push_flash, take_flashes};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
