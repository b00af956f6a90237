pub mod error_utils;
pub mod loader;
pub mod output;
pub mod validation;
pub mod value;
