pub mod http;
pub mod identity_middleware;
