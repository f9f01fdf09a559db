//! Информация о системе и тактировании

use embassy_rp::clocks;

use crate::config::hardware::frequencies::BUS_FREQUENCY;
use crate::config::persisted::BaudRate;

/// Структура с информацией о частотах системы
#[derive(Debug, Clone, Copy)]
pub struct SystemClocks {
    pub sys_freq: u32,
    pub peri_freq: u32,
    pub ref_freq: u32,
}

/// Получить текущие частоты системы
pub fn get_system_clocks() -> SystemClocks {
    SystemClocks {
        sys_freq: clocks::clk_sys_freq(),
        peri_freq: clocks::clk_peri_freq(),
        ref_freq: clocks::clk_ref_freq(),
    }
}

/// Вывести информацию о частотах в лог
pub fn print_clock_info() {
    let clocks = get_system_clocks();

    defmt::info!("=== Конфигурация тактирования ===");
    defmt::info!("Системная частота: {} МГц", clocks.sys_freq / 1_000_000);
    defmt::info!("Периферийная частота: {} МГц", clocks.peri_freq / 1_000_000);
    defmt::info!("Опорная частота: {} МГц", clocks.ref_freq / 1_000_000);
}

/// Проверить корректность частот для нашего применения
pub fn validate_clocks() -> Result<(), &'static str> {
    let clocks = get_system_clocks();

    // Программная шина: на полупериод нужно хотя бы несколько десятков тактов
    if clocks.sys_freq < BUS_FREQUENCY * 2 * 50 {
        return Err("Системная частота слишком низкая для программной шины");
    }

    // UART делит clk_peri на 16 × скорость; нужен запас для 57600
    let max_baud = BaudRate::ALL.iter().map(|r| r.bps()).max().unwrap_or(0);
    if clocks.peri_freq < max_baud * 16 * 8 {
        return Err("Периферийная частота слишком низкая для UART");
    }

    Ok(())
}
