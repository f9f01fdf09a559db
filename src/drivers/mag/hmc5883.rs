//! Драйвер для магнитометра HMC5883
use crate::config::hardware::bus_addresses::{HMC5883_READ, HMC5883_WRITE};
use crate::data::Axes;
use crate::drivers::bus::{BusAddress, BusController, BusError, TwoWireBus};

/// Регистры HMC5883
#[allow(dead_code)]
pub(crate) mod regs {
    pub const CONFIG_A: u8 = 0x00;      // Конфигурация A
    pub const CONFIG_B: u8 = 0x01;      // Конфигурация B (усиление)
    pub const MODE: u8 = 0x02;          // Режим работы
    pub const DATA_X_MSB: u8 = 0x03;    // Данные X (старший байт)
    pub const DATA_X_LSB: u8 = 0x04;    // Данные X (младший байт)
    pub const DATA_Z_MSB: u8 = 0x05;    // Данные Z (старший байт)
    pub const DATA_Z_LSB: u8 = 0x06;    // Данные Z (младший байт)
    pub const DATA_Y_MSB: u8 = 0x07;    // Данные Y (старший байт)
    pub const DATA_Y_LSB: u8 = 0x08;    // Данные Y (младший байт)
    pub const STATUS: u8 = 0x09;        // Регистр статуса
}

/// Байт после шести байтов данных: чтение статуса возвращает
/// указатель регистров на DATA_X_MSB
const READ_LEN: usize = 7;

/// Частота измерений (биты DO в CONFIG_A)
#[derive(Debug, Clone, Copy)]
pub enum DataRate {
    /// 15 Hz
    Hz15 = 0x10,
}

/// Количество усреднений (биты MA в CONFIG_A)
#[derive(Debug, Clone, Copy)]
pub enum SampleAverage {
    Avg8 = 0x60,
}

/// Диапазон измерений (усиление, CONFIG_B)
#[derive(Debug, Clone, Copy)]
pub enum GainRange {
    /// ±4.7 Га
    Ga4_7 = 0xA0,
}

/// Режим работы
#[derive(Debug, Clone, Copy)]
pub enum OperatingMode {
    /// Непрерывное измерение
    Continuous = 0x00,
}

/// Драйвер HMC5883
pub struct Hmc5883 {
    addr: BusAddress,
    averaging: SampleAverage,
    rate: DataRate,
    gain: GainRange,
}

impl Default for Hmc5883 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hmc5883 {
    /// 8 усреднений, 15 Гц, ±4.7 Га
    pub const fn new() -> Self {
        Self {
            addr: BusAddress::new(HMC5883_WRITE, HMC5883_READ),
            averaging: SampleAverage::Avg8,
            rate: DataRate::Hz15,
            gain: GainRange::Ga4_7,
        }
    }

    /// Конфигурация A, B и режим: три отдельные транзакции
    pub fn init<B: TwoWireBus>(&self, bus: &mut BusController<B>) -> Result<(), BusError> {
        // Конфигурация A: усреднение, частота, нормальный режим измерения
        let config_a = self.averaging as u8 | self.rate as u8;
        bus.write_register(self.addr, regs::CONFIG_A, config_a)?;
        bus.write_register(self.addr, regs::CONFIG_B, self.gain as u8)?;
        bus.write_register(self.addr, regs::MODE, OperatingMode::Continuous as u8)?;
        log_debug!("HMC5883 настроен: A={=u8:#x}", config_a);
        Ok(())
    }

    /// Чтение всех трёх осей
    ///
    /// Перед чтением датчик настраивается заново, затем одной транзакцией
    /// выбирается DATA_X_MSB и принимаются семь байтов.
    pub fn read_all<B: TwoWireBus>(&self, bus: &mut BusController<B>) -> Result<Axes, BusError> {
        self.init(bus)?;

        let mut buf = [0u8; READ_LEN];
        bus.read_registers(self.addr, regs::DATA_X_MSB, &mut buf)?;

        // Порядок в регистрах: X, Z, Y
        Ok(Axes {
            x: i16::from_be_bytes([buf[0], buf[1]]),
            z: i16::from_be_bytes([buf[2], buf[3]]),
            y: i16::from_be_bytes([buf[4], buf[5]]),
        })
    }
}
