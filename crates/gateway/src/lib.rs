pub mod auth;
pub mod content;
pub mod error;
pub mod server;
pub mod state;
pub mod twitter_api;

pub use {
    error::ApiError,
    server::{router, start_gateway},
    state::GatewayState,
};
