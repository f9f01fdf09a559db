//! Данные датчиков и кадры телеметрии

use core::fmt::{self, Write};
use heapless::String;

/// Ёмкость строки кадра: '$' + 9 полей по 6 символов + 8 запятых + "#\r\n"
pub const FRAME_CAPACITY: usize = 72;

/// Ось датчика
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Отсчёт по трём осям в единицах LSB (без пересчёта в физические единицы)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Axes {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> i16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: i16) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    /// Все три оси равны: датчик на самом деле не измеряет
    pub fn is_degenerate(&self) -> bool {
        self.x == self.y && self.y == self.z
    }
}

/// Кадр потокового режима: акселерометр, гироскоп, магнитометр
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub accel: Axes,
    pub gyro: Axes,
    pub mag: Axes,
}

impl Frame {
    /// Строка кадра с переводом строки в конце
    pub fn render(&self) -> String<FRAME_CAPACITY> {
        let mut line = String::new();
        // Ёмкость рассчитана на худший случай, ошибки быть не может
        let _ = write!(line, "{}\r\n", self);
        line
    }
}

impl fmt::Display for Frame {
    /// `$ax,ay,az,gx,gy,gz,mx,my,mz#`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${},{},{},{},{},{},{},{},{}#",
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
            self.mag.x,
            self.mag.y,
            self.mag.z
        )
    }
}

/// Результат самотестирования (не сохраняется)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelfTestReport {
    pub magnetometer: bool,
    pub accelerometer: bool,
    pub gyroscope: bool,
}

impl SelfTestReport {
    pub fn all_passed(&self) -> bool {
        self.magnetometer && self.accelerometer && self.gyroscope
    }
}
