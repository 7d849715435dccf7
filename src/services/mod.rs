pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod token;
pub use token::{Claims, TokenService};

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserRecord, UserService};
pub use user_service_impl::SeaOrmUserService;
