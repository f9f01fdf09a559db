pub mod hmc5883;

pub use hmc5883::Hmc5883;
