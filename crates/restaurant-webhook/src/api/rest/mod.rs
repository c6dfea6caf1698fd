//! Webhook REST endpoints

pub mod handlers;
pub mod review;
pub mod router;
pub mod state;
