//! HTTP boundary for pshield: anonymize, reveal and rule listing over axum

pub mod protocol;
pub mod server;

pub use server::ShieldServer;
