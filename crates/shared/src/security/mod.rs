pub mod authenticate;
pub mod headers;
pub mod sanitize;
