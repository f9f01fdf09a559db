//! Потоковый режим: кадр всех девяти осей каждые 20 мс
//!
//! Акселерометр и гироскоп читаются на каждом такте, магнитометр раз в
//! `MAG_TICK_DIVIDER` тактов (датчику нужно не меньше 100 мс между
//! измерениями); между обновлениями в кадр идёт последнее значение.

use embedded_hal_async::delay::DelayNs;

use super::AppError;
use crate::config::hardware::timing::{MAG_TICK_DIVIDER, STREAM_TICK_MS};
use crate::console::Console;
use crate::data::{Axes, Frame};
use crate::drivers::{BusError, TwoWireBus};
use crate::platform::SerialPort;
use crate::sensors::SensorSuite;

/// Состояние потокового сеанса
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamSession {
    tick: u32,
    mag: Axes,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Номер следующего такта
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Один такт: собрать кадр
    pub fn tick<B: TwoWireBus>(&mut self, sensors: &mut SensorSuite<B>) -> Result<Frame, BusError> {
        let accel = sensors.read_accel()?;
        let gyro = sensors.read_gyro()?;
        if self.tick % MAG_TICK_DIVIDER == 0 {
            self.mag = sensors.read_mag()?;
        }
        let frame = Frame {
            accel,
            gyro,
            mag: self.mag,
        };
        #[cfg(feature = "debug-sensors")]
        log_debug!("Такт {=u32}: {}", self.tick, frame);
        self.tick = self.tick.wrapping_add(1);
        Ok(frame)
    }
}

/// Выдавать кадры, пока не придёт входящий байт; возвращает этот байт
pub async fn run<B, S, D>(
    session: &mut StreamSession,
    sensors: &mut SensorSuite<B>,
    console: &mut Console<S>,
    delay: &mut D,
) -> Result<u8, AppError>
where
    B: TwoWireBus,
    S: SerialPort,
    D: DelayNs,
{
    loop {
        if let Some(byte) = console.try_read()? {
            return Ok(byte);
        }
        let frame = session.tick(sensors)?;
        console.write_str(&frame.render())?;
        delay.delay_ms(STREAM_TICK_MS).await;
    }
}
