// Domain layer: account models and capability ports (interfaces) for the OS tools.

pub mod model;
pub mod ports;
