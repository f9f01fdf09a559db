pub mod accel;
pub mod bus;
pub mod gyro;
pub mod mag;

pub use accel::Adxl345;
pub use bus::{Ack, BusAddress, BusController, BusError, TwoWireBus};
pub use gyro::Itg3200;
pub use mag::Hmc5883;
