// Domain layer: value objects, built-in tables and provider ports.

pub mod defaults;
pub mod model;
pub mod ports;
