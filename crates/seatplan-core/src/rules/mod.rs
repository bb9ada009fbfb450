pub mod validation;

pub use validation::{validate_capacity, validate_name};
