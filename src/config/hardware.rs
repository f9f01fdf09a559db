//! Конфигурация аппаратного обеспечения платы 9DOF IMU

/// Конфигурация пинов GPIO (RP2040)
pub mod pins {
    /// Двухпроводная шина датчиков (программная, open-drain)
    pub mod bus {
        /// Пин SDA
        pub const SDA_PIN: u8 = 4; // GPIO4
        /// Пин SCL
        pub const SCL_PIN: u8 = 5; // GPIO5
    }

    /// UART консоли
    pub mod console {
        /// Пин TX для UART0
        pub const TX_PIN: u8 = 0; // GPIO0
        /// Пин RX для UART0
        pub const RX_PIN: u8 = 1; // GPIO1
    }

    /// Дополнительные пины
    pub mod misc {
        /// Светодиод статуса (индикатор самотестирования)
        pub const STATUS_LED_PIN: u8 = 25; // GPIO25
    }
}

/// Конфигурация частот и скоростей
pub mod frequencies {
    /// Частота двухпроводной шины (Гц)
    pub const BUS_FREQUENCY: u32 = 100_000; // 100 kHz, standard mode

    /// Скорость консоли по умолчанию (бод)
    pub const DEFAULT_BAUDRATE: u32 = 57_600;
}

/// Адреса устройств на шине (8-битные: запись / чтение)
pub mod bus_addresses {
    /// ADXL345, вывод ALT ADDRESS подтянут к земле
    pub const ADXL345_WRITE: u8 = 0xA6;
    pub const ADXL345_READ: u8 = 0xA7;

    /// HMC5883
    pub const HMC5883_WRITE: u8 = 0x3C;
    pub const HMC5883_READ: u8 = 0x3D;

    /// ITG-3200, вывод AD0 подтянут к земле
    pub const ITG3200_WRITE: u8 = 0xD0;
    pub const ITG3200_READ: u8 = 0xD1;
}

/// Тайминги (мс, если не указано иное)
pub mod timing {
    /// Период такта потокового режима
    pub const STREAM_TICK_MS: u32 = 20;

    /// Магнитометр обновляется раз в столько тактов (20 × 20 мс = 400 мс)
    pub const MAG_TICK_DIVIDER: u32 = 20;

    /// Период вывода акселерометра и гироскопа в меню
    pub const FAST_DISPLAY_MS: u32 = 20;

    /// Период вывода магнитометра и сырого кадра в меню
    /// (не меньше 100 мс между измерениями HMC5883)
    pub const SLOW_DISPLAY_MS: u32 = 350;

    /// Пауза гироскопа между шагами инициализации
    pub const GYRO_SETTLE_MS: u32 = 10;

    /// Полупериод мигания светодиода при успешном самотестировании
    pub const BLINK_HALF_PERIOD_MS: u32 = 1000;

    /// Количество миганий при успешном самотестировании
    pub const BLINK_COUNT: u8 = 5;

    /// Пауза перед сменой скорости порта (дать уйти сообщению)
    pub const BAUD_SWITCH_DRAIN_MS: u32 = 50;

    /// Интервал опроса порта в ожидании команды
    pub const INPUT_POLL_MS: u32 = 1;

    /// Пауза перед повтором режима после ошибки
    pub const ERROR_RETRY_MS: u32 = 100;

    /// Бюджет ожидания линии шины в полупериодах (~1 мс при 100 kHz)
    pub const BUS_WAIT_BUDGET: u32 = 200;
}

/// Эмуляция EEPROM во flash
pub mod storage {
    /// Общий объём flash на плате
    pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

    /// Размер сектора стирания
    pub const SECTOR_SIZE: u32 = 4096;

    /// Смещение сектора конфигурации (последний сектор flash)
    pub const CONFIG_SECTOR_OFFSET: u32 = FLASH_SIZE as u32 - SECTOR_SIZE;

    /// Сколько байт сектора используется под карту "EEPROM"
    pub const EEPROM_SIZE: usize = 16;
}

/// Управляющие байты консоли
pub mod keys {
    /// Ctrl+Z: переключение меню / потоковый режим
    pub const TOGGLE_AUTORUN: u8 = 0x1A;

    /// Ctrl+P: самотестирование по запросу
    pub const SELF_TEST: u8 = 0x10;

    /// Справка
    pub const HELP: u8 = b'?';
}
