pub mod adxl345;

pub use adxl345::Adxl345;
