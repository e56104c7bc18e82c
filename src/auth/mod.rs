//! Authentication Module
//! Mission: Login against the credential store and JWT-based request authorization

pub mod api;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod user_store;

pub use gate::AuthGate;
pub use jwt::TokenService;
pub use middleware::auth_middleware;
pub use user_store::UserStore;
