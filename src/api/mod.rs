pub mod installations;
pub mod response;
pub mod users;

pub use installations::InstallationsApi;
pub use users::{Expiry, UsersApi};
