//! Драйвер для акселерометра ADXL345
//!
//! Датчик отдаёт регистры только пакетным чтением: каждый регистр
//! читается двумя байтами (значение + следующий регистр, который
//! отбрасывается). Оси хранятся младшим байтом вперёд.

use crate::config::hardware::bus_addresses::{ADXL345_READ, ADXL345_WRITE};
use crate::data::{Axes, Axis};
use crate::drivers::bus::{BusAddress, BusController, BusError, TwoWireBus};

/// Регистры ADXL345
#[allow(dead_code)]
pub(crate) mod regs {
    pub const DEVID: u8 = 0x00;         // Идентификатор устройства
    pub const POWER_CTL: u8 = 0x2D;     // Управление питанием
    pub const DATA_FORMAT: u8 = 0x31;   // Формат данных
    pub const DATAX0: u8 = 0x32;        // Данные X (младший байт)
    pub const DATAX1: u8 = 0x33;        // Данные X (старший байт)
    pub const DATAY0: u8 = 0x34;
    pub const DATAY1: u8 = 0x35;
    pub const DATAZ0: u8 = 0x36;
    pub const DATAZ1: u8 = 0x37;
}

/// Ожидаемое значение DEVID
pub const DEVICE_ID: u8 = 0xE5;

/// POWER_CTL: бит Measure
const POWER_CTL_MEASURE: u8 = 0x08;
/// DATA_FORMAT: бит FULL_RES, диапазон ±2g
const DATA_FORMAT_FULL_RES: u8 = 0x08;

/// Драйвер ADXL345
pub struct Adxl345 {
    addr: BusAddress,
}

impl Default for Adxl345 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adxl345 {
    pub const fn new() -> Self {
        Self {
            addr: BusAddress::new(ADXL345_WRITE, ADXL345_READ),
        }
    }

    /// Режим измерения и полное разрешение
    pub fn init<B: TwoWireBus>(&self, bus: &mut BusController<B>) -> Result<(), BusError> {
        bus.write_register(self.addr, regs::POWER_CTL, POWER_CTL_MEASURE)?;
        bus.write_register(self.addr, regs::DATA_FORMAT, DATA_FORMAT_FULL_RES)?;
        log_debug!("ADXL345 в режиме измерения");
        Ok(())
    }

    /// Одна ось: младший и старший байт
    ///
    /// Если хотя бы одно из двух чтений не удалось, значение не возвращается.
    pub fn read_axis<B: TwoWireBus>(&self, bus: &mut BusController<B>, axis: Axis) -> Result<i16, BusError> {
        let low_reg = match axis {
            Axis::X => regs::DATAX0,
            Axis::Y => regs::DATAY0,
            Axis::Z => regs::DATAZ0,
        };
        let low = self.read_register(bus, low_reg)?;
        let high = self.read_register(bus, low_reg + 1)?;
        Ok(i16::from_le_bytes([low, high]))
    }

    pub fn read_all<B: TwoWireBus>(&self, bus: &mut BusController<B>) -> Result<Axes, BusError> {
        let mut axes = Axes::default();
        for axis in Axis::ALL {
            axes.set(axis, self.read_axis(bus, axis)?);
        }
        Ok(axes)
    }

    /// Содержимое DEVID (для самотестирования)
    pub fn read_device_id<B: TwoWireBus>(&self, bus: &mut BusController<B>) -> Result<u8, BusError> {
        self.read_register(bus, regs::DEVID)
    }

    /// Пакетное чтение двух байтов, второй отбрасывается
    fn read_register<B: TwoWireBus>(&self, bus: &mut BusController<B>, reg: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 2];
        bus.read_registers(self.addr, reg, &mut buf)?;
        Ok(buf[0])
    }
}
