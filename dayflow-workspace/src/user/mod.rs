//! User account commands

mod get;
mod register;
mod update;

pub use get::GetProfile;
pub use register::RegisterUser;
pub use update::UpdateProfile;
