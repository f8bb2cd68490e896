pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AuthenticatedUser, RequireAuth};
