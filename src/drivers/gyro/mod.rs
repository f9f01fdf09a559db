pub mod itg3200;

pub use itg3200::Itg3200;
