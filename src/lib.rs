//! Mutopia media gateway library.
//!
//! The gateway fronts the Mutopia API's `/media` namespace so the portal can
//! fetch pet photos and avatars same-origin: CORS preflight answered at the
//! edge, hop-by-hop and cache-override headers stripped, one upstream
//! attempt per request, transport failures translated to 502 JSON.
//!
//! Alongside the proxy core, the crate carries the portal's client-support
//! pieces: the shared session store, the encrypted key-value store, and the
//! scripted scroll animation.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod motion;
pub mod observability;
pub mod session;
pub mod storage;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
