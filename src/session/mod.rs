pub mod accessor;
pub mod user;
