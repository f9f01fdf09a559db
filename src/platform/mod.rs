//! Аппаратные сервисы, которые прошивка получает извне
//!
//! Сюда вынесено всё, что зависит от микроконтроллера: последовательный
//! порт и энергонезависимая память. Двухпроводная шина описана рядом с
//! движком транзакций в [`crate::drivers::bus`], светодиод и задержки
//! берутся напрямую из `embedded-hal`.

use core::fmt;

#[cfg(feature = "rp2040")]
pub mod rp2040;

/// Ошибки последовательного порта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Переполнение приёмного FIFO
    Overrun,
    /// Ошибка кадра (неверный стоп-бит)
    Framing,
    /// Ошибка чётности
    Parity,
    /// Линия в состоянии break
    Break,
    /// Скорость не поддерживается портом
    UnsupportedBaudrate,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::Overrun => f.write_str("UART: RX overrun"),
            SerialError::Framing => f.write_str("UART: framing error"),
            SerialError::Parity => f.write_str("UART: parity error"),
            SerialError::Break => f.write_str("UART: break condition"),
            SerialError::UnsupportedBaudrate => f.write_str("UART: unsupported baud rate"),
        }
    }
}

/// Последовательный порт консоли
///
/// Все операции синхронные: запись блокирует до передачи в FIFO,
/// чтение не блокирует и сразу сообщает, есть ли входящий байт.
pub trait SerialPort {
    /// Передать байты
    fn write(&mut self, bytes: &[u8]) -> Result<(), SerialError>;

    /// Забрать входящий байт, если он есть
    fn try_read(&mut self) -> Result<Option<u8>, SerialError>;

    /// Перенастроить скорость без перезапуска
    fn set_baudrate(&mut self, baudrate: u32) -> Result<(), SerialError>;
}

/// Ошибки энергонезависимой памяти
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Адрес за пределами карты
    OutOfRange,
    /// Ошибка стирания/записи flash
    Flash,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::OutOfRange => f.write_str("storage: address out of range"),
            StorageError::Flash => f.write_str("storage: flash operation failed"),
        }
    }
}

/// Байтовая энергонезависимая память (EEPROM или её эмуляция)
///
/// Один вызов `write` — одно логическое обновление: либо записаны все
/// байты, либо ни одного.
pub trait NvStorage {
    /// Прочитать `buf.len()` байт начиная с `address`
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Записать `data` начиная с `address`
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), StorageError>;
}
