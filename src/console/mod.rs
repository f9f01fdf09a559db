//! Консоль на последовательном порту
//!
//! Форматированный вывод идёт прямо в порт через `core::fmt::Write`,
//! без промежуточного буфера. Ожидание байта опрашивает порт с
//! короткой асинхронной паузой.

use core::fmt::{self, Write};

use embedded_hal_async::delay::DelayNs;

use crate::config::hardware::timing::INPUT_POLL_MS;
use crate::platform::{SerialError, SerialPort};

pub mod text;

pub struct Console<S> {
    port: S,
}

/// Адаптер `fmt::Write`, сохраняющий ошибку порта
struct PortWriter<'a, S> {
    port: &'a mut S,
    error: Option<SerialError>,
}

impl<S: SerialPort> Write for PortWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.port.write(s.as_bytes()).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

impl<S: SerialPort> Console<S> {
    pub fn new(port: S) -> Self {
        Self { port }
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), SerialError> {
        self.port.write(s.as_bytes())
    }

    pub fn write_line(&mut self, s: &str) -> Result<(), SerialError> {
        self.port.write(s.as_bytes())?;
        self.port.write(b"\r\n")
    }

    /// Вывод по `format_args!`
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), SerialError> {
        let mut writer = PortWriter {
            port: &mut self.port,
            error: None,
        };
        match writer.write_fmt(args) {
            Ok(()) => Ok(()),
            // fmt::Error без ошибки порта возникает только в реализации Display
            Err(_) => Err(writer.error.unwrap_or(SerialError::Overrun)),
        }
    }

    pub fn try_read(&mut self) -> Result<Option<u8>, SerialError> {
        self.port.try_read()
    }

    /// Дождаться байта
    pub async fn read_byte<D: DelayNs>(&mut self, delay: &mut D) -> Result<u8, SerialError> {
        loop {
            if let Some(byte) = self.port.try_read()? {
                return Ok(byte);
            }
            delay.delay_ms(INPUT_POLL_MS).await;
        }
    }

    pub fn set_baudrate(&mut self, baudrate: u32) -> Result<(), SerialError> {
        self.port.set_baudrate(baudrate)
    }
}
