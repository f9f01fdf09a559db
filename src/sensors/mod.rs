//! Набор датчиков на общей шине
//!
//! Владеет контроллером шины и драйверами. Все обращения к датчикам из
//! меню, потокового режима и самотестирования идут через этот тип, так
//! что транзакции никогда не перекрываются.

use embedded_hal_async::delay::DelayNs;

use crate::data::Axes;
use crate::drivers::accel::adxl345;
use crate::drivers::gyro::itg3200;
use crate::drivers::{Adxl345, BusController, BusError, Hmc5883, Itg3200, TwoWireBus};

pub struct SensorSuite<B> {
    bus: BusController<B>,
    accel: Adxl345,
    mag: Hmc5883,
    gyro: Itg3200,
}

impl<B: TwoWireBus> SensorSuite<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus: BusController::new(bus),
            accel: Adxl345::new(),
            mag: Hmc5883::new(),
            gyro: Itg3200::new(),
        }
    }

    /// Инициализация всех трёх датчиков
    ///
    /// Ошибка одного датчика не мешает настроить остальные; возвращается
    /// первая ошибка.
    pub async fn init_all<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), BusError> {
        let accel = self.accel.init(&mut self.bus);
        if let Err(e) = accel {
            log_warn!("ADXL345: ошибка инициализации: {}", e);
        }
        let mag = self.mag.init(&mut self.bus);
        if let Err(e) = mag {
            log_warn!("HMC5883: ошибка инициализации: {}", e);
        }
        let gyro = self.gyro.init(&mut self.bus, delay).await;
        if let Err(e) = gyro {
            log_warn!("ITG-3200: ошибка инициализации: {}", e);
        }
        accel.and(mag).and(gyro)
    }

    /// Повторная настройка акселерометра и магнитометра (перед показом меню)
    pub fn reinit_accel_mag(&mut self) -> Result<(), BusError> {
        self.accel.init(&mut self.bus)?;
        self.mag.init(&mut self.bus)
    }

    pub fn read_accel(&mut self) -> Result<Axes, BusError> {
        self.accel.read_all(&mut self.bus)
    }

    pub fn read_gyro(&mut self) -> Result<Axes, BusError> {
        self.gyro.read_all(&mut self.bus)
    }

    pub fn read_mag(&mut self) -> Result<Axes, BusError> {
        self.mag.read_all(&mut self.bus)
    }

    /// DEVID акселерометра совпадает с ожидаемым
    pub fn accel_identity_ok(&mut self) -> Result<bool, BusError> {
        let id = self.accel.read_device_id(&mut self.bus)?;
        log_debug!("ADXL345 DEVID = {=u8:#x}", id);
        Ok(id == adxl345::DEVICE_ID)
    }

    /// WHO_AM_I гироскопа совпадает с одним из ожидаемых
    pub fn gyro_identity_ok(&mut self) -> Result<bool, BusError> {
        let id = self.gyro.who_am_i(&mut self.bus)?;
        log_debug!("ITG-3200 WHO_AM_I = {=u8:#x}", id);
        Ok(itg3200::DEVICE_IDS.contains(&id))
    }

    /// Магнитометр выдаёт не вырожденные данные
    pub fn mag_alive(&mut self) -> Result<bool, BusError> {
        let axes = self.read_mag()?;
        Ok(!axes.is_degenerate())
    }
}
