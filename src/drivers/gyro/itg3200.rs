//! Драйвер для гироскопа ITG-3200
//!
//! Каждый байт читается отдельной адресованной транзакцией (один байт,
//! NACK). До, между и после чтений контроллер шины сбрасывается:
//! датчик иначе оставляет шину в несогласованном состоянии.
use embedded_hal_async::delay::DelayNs;

use crate::config::hardware::bus_addresses::{ITG3200_READ, ITG3200_WRITE};
use crate::config::hardware::timing::GYRO_SETTLE_MS;
use crate::data::{Axes, Axis};
use crate::drivers::bus::{BusAddress, BusController, BusError, TwoWireBus};

/// Регистры ITG-3200
#[allow(dead_code)]
pub(crate) mod regs {
    pub const WHO_AM_I: u8 = 0x00;      // Адрес на шине
    pub const DLPF_FS: u8 = 0x16;       // Фильтр и диапазон
    pub const GYRO_XOUT_H: u8 = 0x1D;   // Данные X (старший байт)
    pub const GYRO_XOUT_L: u8 = 0x1E;
    pub const GYRO_YOUT_H: u8 = 0x1F;
    pub const GYRO_YOUT_L: u8 = 0x20;
    pub const GYRO_ZOUT_H: u8 = 0x21;
    pub const GYRO_ZOUT_L: u8 = 0x22;
    pub const PWR_MGM: u8 = 0x3E;       // Управление питанием
}

/// Допустимые значения WHO_AM_I (зависит от вывода AD0)
pub const DEVICE_IDS: [u8; 2] = [0x68, 0x69];

/// PWR_MGM: программный сброс
const PWR_MGM_RESET: u8 = 0x80;
/// PWR_MGM: внутренний генератор, все оси активны
const PWR_MGM_RUN: u8 = 0x00;

/// Диапазон измерения (FS_SEL)
#[derive(Debug, Clone, Copy)]
pub enum FullScale {
    /// ±2000 °/с, единственное рабочее значение
    Dps2000 = 0x18,
}

/// Полоса цифрового фильтра (DLPF_CFG)
#[derive(Debug, Clone, Copy)]
pub enum LowPass {
    Hz256 = 0x00,
}

/// Драйвер ITG-3200
pub struct Itg3200 {
    addr: BusAddress,
    scale: FullScale,
    filter: LowPass,
}

impl Default for Itg3200 {
    fn default() -> Self {
        Self::new()
    }
}

impl Itg3200 {
    /// ±2000 °/с, фильтр 256 Гц
    pub const fn new() -> Self {
        Self {
            addr: BusAddress::new(ITG3200_WRITE, ITG3200_READ),
            scale: FullScale::Dps2000,
            filter: LowPass::Hz256,
        }
    }

    /// Сброс, диапазон и фильтр, запуск
    pub async fn init<B, D>(&self, bus: &mut BusController<B>, delay: &mut D) -> Result<(), BusError>
    where
        B: TwoWireBus,
        D: DelayNs,
    {
        bus.write_register(self.addr, regs::PWR_MGM, PWR_MGM_RESET)?;
        delay.delay_ms(GYRO_SETTLE_MS).await;

        bus.write_register(self.addr, regs::DLPF_FS, self.scale as u8 | self.filter as u8)?;
        delay.delay_ms(GYRO_SETTLE_MS).await;

        bus.write_register(self.addr, regs::PWR_MGM, PWR_MGM_RUN)?;
        log_debug!("ITG-3200 запущен");
        Ok(())
    }

    /// Одна ось: старший и младший байт, со сбросами шины вокруг чтений
    pub fn read_axis<B: TwoWireBus>(&self, bus: &mut BusController<B>, axis: Axis) -> Result<i16, BusError> {
        let high_reg = match axis {
            Axis::X => regs::GYRO_XOUT_H,
            Axis::Y => regs::GYRO_YOUT_H,
            Axis::Z => regs::GYRO_ZOUT_H,
        };
        bus.reset()?;
        let high = self.read_register(bus, high_reg)?;
        bus.reset()?;
        let low = self.read_register(bus, high_reg + 1)?;
        bus.reset()?;
        Ok(i16::from_be_bytes([high, low]))
    }

    pub fn read_all<B: TwoWireBus>(&self, bus: &mut BusController<B>) -> Result<Axes, BusError> {
        let mut axes = Axes::default();
        for axis in Axis::ALL {
            axes.set(axis, self.read_axis(bus, axis)?);
        }
        Ok(axes)
    }

    /// Содержимое WHO_AM_I (для самотестирования)
    pub fn who_am_i<B: TwoWireBus>(&self, bus: &mut BusController<B>) -> Result<u8, BusError> {
        bus.reset()?;
        let id = self.read_register(bus, regs::WHO_AM_I)?;
        bus.reset()?;
        Ok(id)
    }

    fn read_register<B: TwoWireBus>(&self, bus: &mut BusController<B>, reg: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        bus.read_registers(self.addr, reg, &mut buf)?;
        Ok(buf[0])
    }
}
