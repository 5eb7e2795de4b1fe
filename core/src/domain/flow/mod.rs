pub mod flows;
pub mod gateway;
pub mod ports;
pub mod services;
pub mod template;
pub mod value_objects;

pub use gateway::{Flow, run_flow};
pub use ports::*;
pub use value_objects::*;
