//! Экраны меню
//!
//! Циклы показа выводят данные с фиксированным периодом до первого
//! входящего байта и возвращают его: решение о том, что с ним делать,
//! принимает автомат режимов.

use embedded_hal_async::delay::DelayNs;

use super::AppError;
use crate::config::persisted::BaudRate;
use crate::console::{text, Console};
use crate::data::{Axes, Frame};
use crate::drivers::TwoWireBus;
use crate::platform::{SerialError, SerialPort};
use crate::sensors::SensorSuite;

/// Что показывает цикл
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Accelerometer,
    Magnetometer,
    Gyroscope,
    Raw,
}

impl Screen {
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            b'1' => Some(Screen::Accelerometer),
            b'2' => Some(Screen::Magnetometer),
            b'3' => Some(Screen::Gyroscope),
            b'4' => Some(Screen::Raw),
            _ => None,
        }
    }

    /// Период обновления; магнитометру нужно не меньше 100 мс между измерениями
    pub fn period_ms(self) -> u32 {
        use crate::config::hardware::timing::{FAST_DISPLAY_MS, SLOW_DISPLAY_MS};
        match self {
            Screen::Accelerometer | Screen::Gyroscope => FAST_DISPLAY_MS,
            Screen::Magnetometer | Screen::Raw => SLOW_DISPLAY_MS,
        }
    }

    /// Одна строка экрана
    fn render<B, S>(self, sensors: &mut SensorSuite<B>, console: &mut Console<S>) -> Result<(), AppError>
    where
        B: TwoWireBus,
        S: SerialPort,
    {
        match self {
            Screen::Accelerometer => print_accel(console, &sensors.read_accel()?)?,
            Screen::Magnetometer => print_mag(console, &sensors.read_mag()?)?,
            Screen::Gyroscope => print_gyro(console, &sensors.read_gyro()?)?,
            Screen::Raw => {
                let frame = Frame {
                    accel: sensors.read_accel()?,
                    gyro: sensors.read_gyro()?,
                    mag: sensors.read_mag()?,
                };
                console.write_str(&frame.render())?;
            }
        }
        Ok(())
    }
}

pub fn print_accel<S: SerialPort>(console: &mut Console<S>, a: &Axes) -> Result<(), SerialError> {
    console.print(format_args!("x={:4}, y={:4}, z={:4}\r\n", a.x, a.y, a.z))
}

pub fn print_mag<S: SerialPort>(console: &mut Console<S>, m: &Axes) -> Result<(), SerialError> {
    console.print(format_args!("x={:4}, y={:4}, z={}\r\n", m.x, m.y, m.z))
}

pub fn print_gyro<S: SerialPort>(console: &mut Console<S>, g: &Axes) -> Result<(), SerialError> {
    console.print(format_args!("x= {:4}, y= {:4}, z= {:4}\r\n", g.x, g.y, g.z))
}

/// Цикл показа до первого входящего байта; возвращает этот байт
pub async fn show<B, S, D>(
    screen: Screen,
    sensors: &mut SensorSuite<B>,
    console: &mut Console<S>,
    delay: &mut D,
) -> Result<u8, AppError>
where
    B: TwoWireBus,
    S: SerialPort,
    D: DelayNs,
{
    log_debug!("Экран {}", screen);
    loop {
        if let Some(byte) = console.try_read()? {
            return Ok(byte);
        }
        screen.render(sensors, console)?;
        delay.delay_ms(screen.period_ms()).await;
    }
}

/// Главное меню с текущей скоростью порта
pub fn render_menu<S: SerialPort>(console: &mut Console<S>, baud: BaudRate) -> Result<(), SerialError> {
    console.write_str(text::BANNER)?;
    for item in text::MENU_ITEMS {
        console.write_line(item)?;
    }
    console.print(format_args!("{}{}bps\r\n", text::MENU_BAUD, baud.bps()))?;
    for item in text::MENU_FOOTER {
        console.write_line(item)?;
    }
    Ok(())
}

pub fn render_help<S: SerialPort>(console: &mut Console<S>) -> Result<(), SerialError> {
    for line in text::HELP {
        console.write_line(line)?;
    }
    Ok(())
}

/// Подменю скоростей: клавиши '1'..='5'
pub fn render_baud_menu<S: SerialPort>(console: &mut Console<S>) -> Result<(), SerialError> {
    console.write_line(text::BAUD_MENU_TITLE)?;
    for (key, rate) in (b'1'..).zip(BaudRate::ALL) {
        console.print(format_args!("[{}] {}\r\n", key as char, rate.bps()))?;
    }
    Ok(())
}
