pub mod extractor;
pub mod jwt;
pub mod password;
pub mod registration;
pub mod reset;
pub mod session;
