//! Привязка к RP2040: UART консоли и эмуляция EEPROM во flash

use embassy_rp::flash::{Blocking as FlashBlocking, Flash};
use embassy_rp::peripherals::{FLASH, UART0};
use embassy_rp::uart::{self, Blocking, Uart};

use super::{NvStorage, SerialError, SerialPort, StorageError};
use crate::config::hardware::storage::{CONFIG_SECTOR_OFFSET, EEPROM_SIZE, FLASH_SIZE, SECTOR_SIZE};

/// Страница программирования flash
const PAGE_SIZE: usize = 256;

fn map_uart_error(error: uart::Error) -> SerialError {
    match error {
        uart::Error::Overrun => SerialError::Overrun,
        uart::Error::Parity => SerialError::Parity,
        uart::Error::Break => SerialError::Break,
        _ => SerialError::Framing,
    }
}

/// UART0 в блокирующем режиме
pub struct UartConsole<'d> {
    uart: Uart<'d, UART0, Blocking>,
}

impl<'d> UartConsole<'d> {
    pub fn new(uart: Uart<'d, UART0, Blocking>) -> Self {
        Self { uart }
    }
}

impl SerialPort for UartConsole<'_> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.uart.blocking_write(bytes).map_err(map_uart_error)
    }

    fn try_read(&mut self) -> Result<Option<u8>, SerialError> {
        match embedded_hal_nb::serial::Read::read(&mut self.uart) {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(e)) => Err(map_uart_error(e)),
        }
    }

    fn set_baudrate(&mut self, baudrate: u32) -> Result<(), SerialError> {
        // Дождаться, пока уйдёт всё, что уже в FIFO
        self.uart.blocking_flush().map_err(map_uart_error)?;
        self.uart.set_baudrate(baudrate);
        Ok(())
    }
}

/// "EEPROM" в последнем секторе flash
///
/// Образ держится в ОЗУ. Каждая запись стирает сектор и программирует
/// одну страницу целиком; при обрыве питания между стиранием и записью
/// сектор читается как стёртый, то есть как конфигурация по умолчанию.
pub struct FlashEeprom<'d> {
    flash: Flash<'d, FLASH, FlashBlocking, FLASH_SIZE>,
    image: [u8; EEPROM_SIZE],
}

impl<'d> FlashEeprom<'d> {
    pub fn new(mut flash: Flash<'d, FLASH, FlashBlocking, FLASH_SIZE>) -> Result<Self, StorageError> {
        let mut image = [0xFF; EEPROM_SIZE];
        flash
            .blocking_read(CONFIG_SECTOR_OFFSET, &mut image)
            .map_err(|_| StorageError::Flash)?;
        Ok(Self { flash, image })
    }

    fn range(address: u8, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
        let start = address as usize;
        let end = start + len;
        if end > EEPROM_SIZE {
            return Err(StorageError::OutOfRange);
        }
        Ok(start..end)
    }
}

impl NvStorage for FlashEeprom<'_> {
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), StorageError> {
        let range = Self::range(address, buf.len())?;
        buf.copy_from_slice(&self.image[range]);
        Ok(())
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), StorageError> {
        let range = Self::range(address, data.len())?;
        self.image[range].copy_from_slice(data);

        let mut page = [0xFF; PAGE_SIZE];
        page[..EEPROM_SIZE].copy_from_slice(&self.image);

        self.flash
            .blocking_erase(CONFIG_SECTOR_OFFSET, CONFIG_SECTOR_OFFSET + SECTOR_SIZE)
            .map_err(|_| StorageError::Flash)?;
        self.flash
            .blocking_write(CONFIG_SECTOR_OFFSET, &page)
            .map_err(|_| StorageError::Flash)?;
        log_debug!("Конфигурация записана во flash ({=usize} байт)", data.len());
        Ok(())
    }
}
