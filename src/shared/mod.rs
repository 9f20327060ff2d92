pub mod errors;
pub mod paths;
pub mod records;
pub mod time;
