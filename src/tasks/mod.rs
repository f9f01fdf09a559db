//! Поведение прошивки: самотестирование, меню, потоковый режим и
//! переключение между ними

use core::fmt;

use crate::drivers::BusError;
use crate::platform::{SerialError, StorageError};

pub mod menu;
pub mod mode;
pub mod streaming;

/// Ошибки уровня приложения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    /// Ошибка шины датчиков
    Bus(BusError),
    /// Ошибка последовательного порта
    Serial(SerialError),
    /// Ошибка энергонезависимой памяти
    Storage(StorageError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for AppError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AppError::Bus(e) => defmt::write!(fmt, "Шина: {}", e),
            AppError::Serial(e) => defmt::write!(fmt, "Порт: {}", e),
            AppError::Storage(e) => defmt::write!(fmt, "Память: {}", e),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Bus(e) => e.fmt(f),
            AppError::Serial(e) => e.fmt(f),
            AppError::Storage(e) => e.fmt(f),
        }
    }
}

impl From<BusError> for AppError {
    fn from(error: BusError) -> Self {
        AppError::Bus(error)
    }
}

impl From<SerialError> for AppError {
    fn from(error: SerialError) -> Self {
        AppError::Serial(error)
    }
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        AppError::Storage(error)
    }
}
