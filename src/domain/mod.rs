// Domain layer: the LEI record model and the ports the lookup client talks through.

pub mod model;
pub mod ports;
