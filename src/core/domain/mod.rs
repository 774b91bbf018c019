pub mod error;
pub mod model;
pub mod units;
pub mod value_object;
