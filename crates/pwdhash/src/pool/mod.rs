mod handler;
mod manager;
mod worker;

pub use handler::*;
pub use manager::*;
