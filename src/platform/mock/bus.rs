//! Модель шины с тремя датчиками
//!
//! Каждый датчик — набор регистров с указателем: первый байт записи
//! после адреса выбирает регистр, остальные пишутся подряд, чтение
//! отдаёт регистр под указателем и сдвигает его. Все вызовы примитивов
//! записываются в журнал событий.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::hardware::bus_addresses::*;
use crate::data::Axes;
use crate::drivers::accel::adxl345::{self, regs as accel_regs};
use crate::drivers::bus::{Ack, BusError, TwoWireBus};
use crate::drivers::gyro::itg3200::regs as gyro_regs;
use crate::drivers::mag::hmc5883::regs as mag_regs;

const REG_SPACE: usize = 64;

/// Вызов примитива шины
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Begin,
    Write(u8),
    Read(Ack),
    End,
    Disable,
    Enable,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Accel,
    Mag,
    Gyro,
}

struct Device {
    kind: Kind,
    write_addr: u8,
    read_addr: u8,
    regs: [u8; REG_SPACE],
    pointer: u8,
}

impl Device {
    fn new(kind: Kind, write_addr: u8, read_addr: u8) -> Self {
        Self {
            kind,
            write_addr,
            read_addr,
            regs: [0; REG_SPACE],
            pointer: 0,
        }
    }

    fn read_next(&mut self, drift: bool) -> u8 {
        let reg = self.pointer;
        let value = self.regs[reg as usize % REG_SPACE];
        self.pointer = match self.kind {
            // Чтение статуса возвращает указатель к первому регистру данных
            Kind::Mag if reg == mag_regs::STATUS => mag_regs::DATA_X_MSB,
            _ => reg.wrapping_add(1) % REG_SPACE as u8,
        };
        if drift && reg == self.last_data_register() {
            let axes = self.axes();
            self.set_axes(Axes::new(
                axes.x.wrapping_add(1),
                axes.y.wrapping_add(1),
                axes.z.wrapping_add(1),
            ));
        }
        value
    }

    fn write_next(&mut self, value: u8) {
        self.regs[self.pointer as usize % REG_SPACE] = value;
        self.pointer = self.pointer.wrapping_add(1) % REG_SPACE as u8;
    }

    fn last_data_register(&self) -> u8 {
        match self.kind {
            // Байт после DATAZ1 читается только пакетом старшего байта Z
            Kind::Accel => accel_regs::DATAZ1 + 1,
            Kind::Mag => mag_regs::STATUS,
            Kind::Gyro => gyro_regs::GYRO_ZOUT_L,
        }
    }

    fn axes(&self) -> Axes {
        let r = &self.regs;
        let le = |i: u8| i16::from_le_bytes([r[i as usize], r[i as usize + 1]]);
        let be = |i: u8| i16::from_be_bytes([r[i as usize], r[i as usize + 1]]);
        match self.kind {
            Kind::Accel => Axes::new(le(0x32), le(0x34), le(0x36)),
            Kind::Mag => Axes::new(be(0x03), be(0x07), be(0x05)),
            Kind::Gyro => Axes::new(be(0x1D), be(0x1F), be(0x21)),
        }
    }

    fn set_axes(&mut self, axes: Axes) {
        let mut put = |at: u8, bytes: [u8; 2]| {
            self.regs[at as usize..at as usize + 2].copy_from_slice(&bytes);
        };
        match self.kind {
            Kind::Accel => {
                put(0x32, axes.x.to_le_bytes());
                put(0x34, axes.y.to_le_bytes());
                put(0x36, axes.z.to_le_bytes());
            }
            Kind::Mag => {
                put(0x03, axes.x.to_be_bytes());
                put(0x05, axes.z.to_be_bytes());
                put(0x07, axes.y.to_be_bytes());
            }
            Kind::Gyro => {
                put(0x1D, axes.x.to_be_bytes());
                put(0x1F, axes.y.to_be_bytes());
                put(0x21, axes.z.to_be_bytes());
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Idle,
    /// После START ждём байт адреса
    Address,
    /// Устройство адресовано (None — на шине никого с таким адресом)
    Addressed {
        device: Option<usize>,
        reading: bool,
        register_selected: bool,
    },
}

struct State {
    events: Vec<BusEvent>,
    enabled: bool,
    stalled: bool,
    /// Через сколько транзакций шина "зависнет"
    fail_after: Option<u32>,
    drift: bool,
    phase: Phase,
    devices: [Device; 3],
    gyro_resets: usize,
}

impl State {
    fn device(&self, kind: Kind) -> &Device {
        self.devices.iter().find(|d| d.kind == kind).unwrap_or(&self.devices[0])
    }

    fn device_mut(&mut self, kind: Kind) -> &mut Device {
        let index = self.devices.iter().position(|d| d.kind == kind).unwrap_or(0);
        &mut self.devices[index]
    }

    fn check_line(&self) -> Result<(), BusError> {
        if !self.enabled {
            return Err(BusError::Disabled);
        }
        if self.stalled {
            return Err(BusError::Timeout);
        }
        Ok(())
    }
}

/// Шина с ADXL345, HMC5883 и ITG-3200
#[derive(Clone)]
pub struct SimBus {
    state: Rc<RefCell<State>>,
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBus {
    /// Исправные датчики с нулевыми данными, магнитометр видит поле
    pub fn new() -> Self {
        let mut accel = Device::new(Kind::Accel, ADXL345_WRITE, ADXL345_READ);
        accel.regs[accel_regs::DEVID as usize] = adxl345::DEVICE_ID;
        let mut mag = Device::new(Kind::Mag, HMC5883_WRITE, HMC5883_READ);
        mag.set_axes(Axes::new(120, -35, 410));
        let mut gyro = Device::new(Kind::Gyro, ITG3200_WRITE, ITG3200_READ);
        gyro.regs[gyro_regs::WHO_AM_I as usize] = 0x69;

        Self {
            state: Rc::new(RefCell::new(State {
                events: Vec::new(),
                enabled: true,
                stalled: false,
                fail_after: None,
                drift: false,
                phase: Phase::Idle,
                devices: [accel, mag, gyro],
                gyro_resets: 0,
            })),
        }
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn set_accel(&self, axes: Axes) {
        self.state.borrow_mut().device_mut(Kind::Accel).set_axes(axes);
    }

    pub fn set_accel_id(&self, id: u8) {
        self.state.borrow_mut().device_mut(Kind::Accel).regs[accel_regs::DEVID as usize] = id;
    }

    pub fn accel_register(&self, reg: u8) -> u8 {
        self.state.borrow().device(Kind::Accel).regs[reg as usize]
    }

    pub fn set_mag(&self, axes: Axes) {
        self.state.borrow_mut().device_mut(Kind::Mag).set_axes(axes);
    }

    /// Сырые регистры данных 0x03..=0x08
    pub fn set_mag_registers(&self, raw: [u8; 6]) {
        let mut state = self.state.borrow_mut();
        let start = mag_regs::DATA_X_MSB as usize;
        state.device_mut(Kind::Mag).regs[start..start + 6].copy_from_slice(&raw);
    }

    pub fn mag_register(&self, reg: u8) -> u8 {
        self.state.borrow().device(Kind::Mag).regs[reg as usize]
    }

    /// Текущий указатель регистров магнитометра
    pub fn mag_pointer(&self) -> u8 {
        self.state.borrow().device(Kind::Mag).pointer
    }

    pub fn set_gyro(&self, axes: Axes) {
        self.state.borrow_mut().device_mut(Kind::Gyro).set_axes(axes);
    }

    pub fn set_gyro_id(&self, id: u8) {
        self.state.borrow_mut().device_mut(Kind::Gyro).regs[gyro_regs::WHO_AM_I as usize] = id;
    }

    pub fn gyro_register(&self, reg: u8) -> u8 {
        self.state.borrow().device(Kind::Gyro).regs[reg as usize]
    }

    /// Сколько раз гироскоп получил программный сброс
    pub fn gyro_resets(&self) -> usize {
        self.state.borrow().gyro_resets
    }

    /// Зависшая шина: любой примитив заканчивается таймаутом
    pub fn set_stalled(&self, stalled: bool) {
        self.state.borrow_mut().stalled = stalled;
    }

    /// Первые `n` транзакций проходят, дальше шина зависает
    pub fn fail_after_transactions(&self, n: u32) {
        self.state.borrow_mut().fail_after = Some(n);
    }

    /// Данные всех датчиков меняются после каждого полного чтения
    pub fn set_drift(&self, drift: bool) {
        self.state.borrow_mut().drift = drift;
    }
}

impl TwoWireBus for SimBus {
    fn begin(&mut self) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        let repeated = !matches!(state.phase, Phase::Idle);
        if !repeated {
            if let Some(left) = state.fail_after {
                if left == 0 {
                    state.stalled = true;
                } else {
                    state.fail_after = Some(left - 1);
                }
            }
        }
        state.check_line()?;
        state.events.push(BusEvent::Begin);
        state.phase = Phase::Address;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        state.check_line()?;
        state.events.push(BusEvent::Write(byte));

        let phase = state.phase;
        match phase {
            Phase::Idle => {}
            Phase::Address => {
                let found = state
                    .devices
                    .iter()
                    .position(|d| d.write_addr == byte || d.read_addr == byte);
                let reading = found.map(|i| state.devices[i].read_addr == byte).unwrap_or(false);
                state.phase = Phase::Addressed {
                    device: found,
                    reading,
                    register_selected: false,
                };
            }
            Phase::Addressed {
                device: Some(index),
                reading: false,
                register_selected,
            } => {
                let device = &mut state.devices[index];
                if register_selected {
                    if device.kind == Kind::Gyro
                        && device.pointer == gyro_regs::PWR_MGM
                        && byte & 0x80 != 0
                    {
                        state.gyro_resets += 1;
                    }
                    state.devices[index].write_next(byte);
                } else {
                    device.pointer = byte % REG_SPACE as u8;
                    state.phase = Phase::Addressed {
                        device: Some(index),
                        reading: false,
                        register_selected: true,
                    };
                }
            }
            Phase::Addressed { .. } => {}
        }
        Ok(())
    }

    fn read_byte(&mut self, ack: Ack) -> Result<u8, BusError> {
        let mut state = self.state.borrow_mut();
        state.check_line()?;
        state.events.push(BusEvent::Read(ack));

        let drift = state.drift;
        let phase = state.phase;
        match phase {
            Phase::Addressed {
                device: Some(index),
                reading: true,
                ..
            } => Ok(state.devices[index].read_next(drift)),
            // Никто не отвечает: линия подтянута вверх
            _ => Ok(0xFF),
        }
    }

    fn end(&mut self) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        state.phase = Phase::Idle;
        state.check_line()?;
        state.events.push(BusEvent::End);
        Ok(())
    }

    fn enable(&mut self) -> Result<(), BusError> {
        let mut state = self.state.borrow_mut();
        state.events.push(BusEvent::Enable);
        state.phase = Phase::Idle;
        if state.stalled {
            return Err(BusError::BusHeld);
        }
        state.enabled = true;
        Ok(())
    }

    fn disable(&mut self) {
        let mut state = self.state.borrow_mut();
        state.events.push(BusEvent::Disable);
        state.enabled = false;
        state.phase = Phase::Idle;
    }

    fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }
}
