#![cfg_attr(not(test), no_std)]

//! Прошивка платы 9DOF IMU: ADXL345 (акселерометр), HMC5883 (магнитометр)
//! и ITG-3200 (гироскоп) на общей двухпроводной шине, меню и потоковый
//! вывод через последовательный порт.
//!
//! Библиотека не зависит от конкретного микроконтроллера: шина, порт,
//! энергонезависимая память, светодиод и задержки приходят через трейты
//! из [`platform`]. Привязка к RP2040 лежит в `platform::rp2040` и в `main.rs`.

#[macro_use]
mod logging;

pub mod config;
pub mod console;
pub mod data;
pub mod drivers;
pub mod platform;
pub mod sensors;
pub mod tasks;
#[cfg(feature = "rp2040")]
pub mod utils;

pub use config::persisted::{BaudRate, ConfigRecord, ConfigStore};
pub use data::{Axes, Axis, Frame, SelfTestReport};
pub use sensors::SensorSuite;
pub use tasks::mode::{App, Mode};
