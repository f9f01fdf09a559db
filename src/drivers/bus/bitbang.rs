//! Программная двухпроводная шина на двух выводах open-drain
//!
//! `set_high()` отпускает линию (её поднимает подтяжка), `set_low()`
//! прижимает к земле, `is_high()` читает фактический уровень. Любое
//! ожидание освобождения SCL (clock stretching) ограничено бюджетом
//! в полупериодах.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::{Ack, BusError, TwoWireBus};
use crate::config::hardware::{frequencies::BUS_FREQUENCY, timing::BUS_WAIT_BUDGET};

/// Сколько тактов SCL подать, чтобы ведомый отпустил SDA
const RECOVERY_CLOCKS: u8 = 9;

pub struct BitBangBus<P, D> {
    sda: P,
    scl: P,
    delay: D,
    half_period_ns: u32,
    wait_budget: u32,
    enabled: bool,
    started: bool,
}

impl<P, D> BitBangBus<P, D>
where
    P: OutputPin + InputPin,
    D: DelayNs,
{
    /// Шина на частоте по умолчанию; контроллер включается сразу
    pub fn new(sda: P, scl: P, delay: D) -> Result<Self, BusError> {
        Self::with_frequency(sda, scl, delay, BUS_FREQUENCY)
    }

    pub fn with_frequency(sda: P, scl: P, delay: D, frequency: u32) -> Result<Self, BusError> {
        let mut bus = Self {
            sda,
            scl,
            delay,
            half_period_ns: 1_000_000_000 / (2 * frequency.max(1)),
            wait_budget: BUS_WAIT_BUDGET,
            enabled: false,
            started: false,
        };
        bus.enable()?;
        Ok(bus)
    }

    fn half(&mut self) {
        self.delay.delay_ns(self.half_period_ns);
    }

    fn sda_release(&mut self) -> Result<(), BusError> {
        self.sda.set_high().map_err(|_| BusError::Pin)
    }

    fn sda_low(&mut self) -> Result<(), BusError> {
        self.sda.set_low().map_err(|_| BusError::Pin)
    }

    fn sda_is_high(&mut self) -> Result<bool, BusError> {
        self.sda.is_high().map_err(|_| BusError::Pin)
    }

    fn scl_low(&mut self) -> Result<(), BusError> {
        self.scl.set_low().map_err(|_| BusError::Pin)
    }

    /// Отпустить SCL и дождаться, пока ведомый перестанет его держать
    fn scl_release(&mut self) -> Result<(), BusError> {
        self.scl.set_high().map_err(|_| BusError::Pin)?;
        for _ in 0..self.wait_budget {
            if self.scl.is_high().map_err(|_| BusError::Pin)? {
                return Ok(());
            }
            self.half();
        }
        log_warn!("Шина: SCL не отпущен, таймаут");
        Err(BusError::Timeout)
    }

    fn check_enabled(&self) -> Result<(), BusError> {
        if self.enabled {
            Ok(())
        } else {
            Err(BusError::Disabled)
        }
    }

    /// Один бит: выставить SDA при низком SCL, затем такт
    fn write_bit(&mut self, bit: bool) -> Result<(), BusError> {
        if bit {
            self.sda_release()?;
        } else {
            self.sda_low()?;
        }
        self.half();
        self.scl_release()?;
        self.half();
        self.scl_low()
    }

    fn read_bit(&mut self) -> Result<bool, BusError> {
        self.sda_release()?;
        self.half();
        self.scl_release()?;
        let bit = self.sda_is_high()?;
        self.half();
        self.scl_low()?;
        Ok(bit)
    }

    /// Подать такты SCL, пока ведомый не отпустит SDA
    fn recover(&mut self) -> Result<(), BusError> {
        for _ in 0..RECOVERY_CLOCKS {
            if self.sda_is_high()? {
                break;
            }
            self.scl_low()?;
            self.half();
            self.scl_release()?;
            self.half();
        }
        if !self.sda_is_high()? {
            log_error!("Шина: SDA удерживается ведомым");
            return Err(BusError::BusHeld);
        }
        Ok(())
    }
}

impl<P, D> TwoWireBus for BitBangBus<P, D>
where
    P: OutputPin + InputPin,
    D: DelayNs,
{
    fn begin(&mut self) -> Result<(), BusError> {
        self.check_enabled()?;
        if self.started {
            // Повторный START: вернуть обе линии вверх, не выпуская шину
            self.sda_release()?;
            self.half();
            self.scl_release()?;
            self.half();
        }
        if !self.sda_is_high()? {
            return Err(BusError::BusHeld);
        }
        self.sda_low()?;
        self.half();
        self.scl_low()?;
        self.started = true;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        self.check_enabled()?;
        for i in (0..8).rev() {
            self.write_bit(byte & (1 << i) != 0)?;
        }
        // NACK не считается ошибкой: шина не проверяет подтверждения
        let nack = self.read_bit()?;
        if nack {
            log_trace!("Шина: NACK на байт {=u8:#x}", byte);
        }
        Ok(())
    }

    fn read_byte(&mut self, ack: Ack) -> Result<u8, BusError> {
        self.check_enabled()?;
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | self.read_bit()? as u8;
        }
        self.write_bit(ack == Ack::Last)?;
        self.sda_release()?;
        Ok(byte)
    }

    fn end(&mut self) -> Result<(), BusError> {
        self.check_enabled()?;
        self.sda_low()?;
        self.half();
        self.scl_release()?;
        self.half();
        self.sda_release()?;
        self.half();
        self.started = false;
        Ok(())
    }

    fn enable(&mut self) -> Result<(), BusError> {
        self.sda_release()?;
        self.scl_release()?;
        self.half();
        self.recover()?;
        self.enabled = true;
        self.started = false;
        Ok(())
    }

    fn disable(&mut self) {
        // Ошибки GPIO здесь некуда вернуть: линии всё равно отпускаются
        let _ = self.sda.set_high();
        let _ = self.scl.set_high();
        self.enabled = false;
        self.started = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
