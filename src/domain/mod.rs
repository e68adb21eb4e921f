// Domain layer: request/result records and the transport port.

pub mod model;
pub mod ports;
