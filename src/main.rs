#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::flash::{Blocking as FlashBlocking, Flash};
use embassy_rp::gpio::{Level, Output, OutputOpenDrain};
use embassy_rp::uart::{self, Config as UartConfig};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use razor_imu_firmware::config::hardware::frequencies::DEFAULT_BAUDRATE;
use razor_imu_firmware::config::hardware::pins;
use razor_imu_firmware::config::hardware::storage::FLASH_SIZE;
use razor_imu_firmware::drivers::BitBangBus;
use razor_imu_firmware::platform::rp2040::{FlashEeprom, UartConsole};
use razor_imu_firmware::utils::system_info;
use razor_imu_firmware::App;

/// Точка входа в программу
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    // Инициализация HAL Raspberry Pi Pico
    let p = embassy_rp::init(Default::default());

    defmt::info!("=== 9DOF IMU v0.1.0 ===");
    defmt::info!("Инициализация системы...");
    // Вывод информации о частотах
    system_info::print_clock_info();

    // Проверка корректности частот
    if let Err(e) = system_info::validate_clocks() {
        defmt::error!("Ошибка конфигурации частот: {}", e);
        panic!("Invalid clock configuration");
    }

    // Светодиод статуса (индикация самотестирования)
    let led = Output::new(p.PIN_25, Level::Low); // GPIO25
    defmt::info!("Светодиод статуса: GPIO{}", pins::misc::STATUS_LED_PIN);

    // Программная двухпроводная шина датчиков
    let bus = {
        let sda = OutputOpenDrain::new(p.PIN_4, Level::High); // GPIO4 - SDA
        let scl = OutputOpenDrain::new(p.PIN_5, Level::High); // GPIO5 - SCL
        defmt::info!(
            "Шина датчиков: SDA=GPIO{}, SCL=GPIO{}",
            pins::bus::SDA_PIN,
            pins::bus::SCL_PIN
        );

        match BitBangBus::new(sda, scl, Delay) {
            Ok(bus) => bus,
            Err(e) => {
                defmt::error!("Шина датчиков не поднимается: {}", e);
                panic!("Sensor bus held");
            }
        }
    };

    // UART консоли; скорость из конфигурации применяется при старте приложения
    let console = {
        let tx = p.PIN_0; // GPIO0 - TX
        let rx = p.PIN_1; // GPIO1 - RX
        defmt::info!(
            "Консоль UART0: TX=GPIO{}, RX=GPIO{}",
            pins::console::TX_PIN,
            pins::console::RX_PIN
        );

        let mut config = UartConfig::default();
        config.baudrate = DEFAULT_BAUDRATE;

        UartConsole::new(uart::Uart::new_blocking(p.UART0, tx, rx, config))
    };

    // Эмуляция EEPROM в последнем секторе flash
    let flash = Flash::<_, FlashBlocking, FLASH_SIZE>::new_blocking(p.FLASH);
    let storage = match FlashEeprom::new(flash) {
        Ok(storage) => storage,
        Err(e) => {
            defmt::error!("Не удалось прочитать flash: {}", e);
            panic!("Config storage unavailable");
        }
    };

    defmt::info!("Запуск приложения...");
    let app = App::boot(bus, console, storage, led, Delay).await;
    app.run().await
}
