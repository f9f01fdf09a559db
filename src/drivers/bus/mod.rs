//! Движок транзакций двухпроводной шины
//!
//! Драйверы датчиков не работают с линиями напрямую: они собирают
//! транзакции из четырёх примитивов (`begin`, `write_byte`, `read_byte`,
//! `end`) через [`BusController`]. Скобка `begin`..`end` всегда закрывается,
//! даже если внутри случилась ошибка, поэтому частичных транзакций на шине
//! не остаётся.

use core::fmt;

mod bitbang;

pub use bitbang::BitBangBus;

/// Подтверждение после принятого байта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// ACK: ведомый продолжает передачу
    More,
    /// NACK: это последний байт транзакции
    Last,
}

/// Ошибки шины
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Линия не отпущена за отведённый бюджет ожидания
    Timeout,
    /// SDA удерживается низким уровнем и не освобождается
    BusHeld,
    /// Контроллер шины выключен
    Disabled,
    /// Ошибка вывода GPIO
    Pin,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Timeout => f.write_str("bus: line wait timed out"),
            BusError::BusHeld => f.write_str("bus: SDA held low"),
            BusError::Disabled => f.write_str("bus: controller disabled"),
            BusError::Pin => f.write_str("bus: GPIO error"),
        }
    }
}

/// Примитивы двухпроводной шины
///
/// Каждый вызов блокирует до завершения операции на линиях.
/// Реализация обязана ограничивать ожидание и возвращать
/// [`BusError::Timeout`], а не зависать.
pub trait TwoWireBus {
    /// START; внутри уже открытой транзакции — повторный START
    fn begin(&mut self) -> Result<(), BusError>;

    /// Передать байт и дождаться такта подтверждения
    fn write_byte(&mut self, byte: u8) -> Result<(), BusError>;

    /// Принять байт и ответить ACK/NACK
    fn read_byte(&mut self, ack: Ack) -> Result<u8, BusError>;

    /// STOP, шина освобождается
    fn end(&mut self) -> Result<(), BusError>;

    /// Включить контроллер шины
    fn enable(&mut self) -> Result<(), BusError>;

    /// Выключить контроллер шины, линии отпускаются
    fn disable(&mut self);

    /// Контроллер включён и принимает примитивы
    fn is_enabled(&self) -> bool;
}

/// Адрес устройства: пара байтов для записи и чтения
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress {
    pub write: u8,
    pub read: u8,
}

impl BusAddress {
    pub const fn new(write: u8, read: u8) -> Self {
        Self { write, read }
    }
}

/// Открытая транзакция (между `begin` и `end`)
pub struct Transaction<'a, B: TwoWireBus> {
    bus: &'a mut B,
}

impl<'a, B: TwoWireBus> Transaction<'a, B> {
    /// Передать байт
    pub fn write(&mut self, byte: u8) -> Result<(), BusError> {
        self.bus.write_byte(byte)
    }

    /// Принять байт
    pub fn read(&mut self, ack: Ack) -> Result<u8, BusError> {
        self.bus.read_byte(ack)
    }

    /// Повторный START без освобождения шины
    pub fn restart(&mut self) -> Result<(), BusError> {
        self.bus.begin()
    }

    /// Адресовать устройство на запись и выбрать регистр
    pub fn select(&mut self, device: BusAddress, register: u8) -> Result<(), BusError> {
        self.write(device.write)?;
        self.write(register)
    }

    /// Повторный START на чтение и приём `buf.len()` байт подряд;
    /// последний байт закрывается NACK
    pub fn read_into(&mut self, device: BusAddress, buf: &mut [u8]) -> Result<(), BusError> {
        self.restart()?;
        self.write(device.read)?;
        let last = buf.len().saturating_sub(1);
        for (i, byte) in buf.iter_mut().enumerate() {
            let ack = if i == last { Ack::Last } else { Ack::More };
            *byte = self.read(ack)?;
        }
        Ok(())
    }
}

/// Контроллер шины: единственный владелец примитивов
pub struct BusController<B> {
    bus: B,
}

impl<B: TwoWireBus> BusController<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Выполнить `f` внутри одной скобки START..STOP
    ///
    /// Если контроллер остался выключенным после неудачного сброса,
    /// перед транзакцией делается одна попытка его включить.
    pub fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut Transaction<'_, B>) -> Result<R, BusError>,
    ) -> Result<R, BusError> {
        if !self.bus.is_enabled() {
            log_warn!("Шина выключена, повторное включение");
            self.bus.enable()?;
        }
        self.bus.begin()?;
        let result = f(&mut Transaction { bus: &mut self.bus });
        // STOP отправляется и после ошибки внутри скобки
        let end = self.bus.end();
        let value = result?;
        end?;
        Ok(value)
    }

    /// Записать один регистр отдельной транзакцией
    pub fn write_register(&mut self, device: BusAddress, register: u8, value: u8) -> Result<(), BusError> {
        self.transaction(|tx| {
            tx.select(device, register)?;
            tx.write(value)
        })
    }

    /// Адресованное чтение: выбор регистра, повторный START, `buf.len()` байт
    pub fn read_registers(&mut self, device: BusAddress, register: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.transaction(|tx| {
            tx.select(device, register)?;
            tx.read_into(device, buf)
        })
    }

    /// Сброс контроллера: выключить и снова включить
    pub fn reset(&mut self) -> Result<(), BusError> {
        self.bus.disable();
        self.bus.enable()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

}
