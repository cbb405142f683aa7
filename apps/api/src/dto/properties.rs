mod conversions;
mod types;

pub use types::{PropertyResponse, RegisterPropertyRequest};
