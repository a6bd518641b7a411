pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, OAuthCallbackRequest, OAuthIdentity, UpdateProfileRequest};
pub use responses::{LoginResponse, OAuthLoginResponse};
