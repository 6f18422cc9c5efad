// Domain layer: extraction models and the ports to external services.

pub mod model;
pub mod ports;
