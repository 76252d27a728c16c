pub mod datetime;
pub mod extract;
pub mod jwt;
pub mod money;
pub mod password;
pub mod validation;
