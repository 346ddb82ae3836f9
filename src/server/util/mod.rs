pub mod clock;
pub mod host;
pub mod json;
pub mod limit;
