//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, /media routes)
//!     → request.rs (request ID, header sanitizing, target URL)
//!     → [single upstream fetch]
//!     → response.rs (CORS decoration, error translation)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::GatewayServer;
