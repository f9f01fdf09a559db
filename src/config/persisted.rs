//! Конфигурация, сохраняемая между перезагрузками
//!
//! Карта байтов (адреса "EEPROM"):
//!
//! ```text
//! 1     флаг режима          48 = автозапуск потокового режима
//! 2     флаг скорости        99 = выбрана пользовательская скорость
//! 3..=7 слоты скоростей      4800 → 4, 9600 → 9, 19200 → 19, 38400 → 38, 57600 → 57
//! ```
//!
//! Любое другое значение байта означает "не активно", поэтому стёртая
//! память (0xFF) читается как конфигурация по умолчанию.

use crate::config::hardware::frequencies::DEFAULT_BAUDRATE;
use crate::platform::{NvStorage, StorageError};

/// Адрес флага режима
pub const MODE_FLAG_ADDR: u8 = 1;
/// Значение флага режима: автозапуск
pub const AUTORUN_SENTINEL: u8 = 48;

/// Адрес флага пользовательской скорости
pub const BAUD_OVERRIDE_ADDR: u8 = 2;
/// Значение флага: скорость выбрана пользователем
pub const BAUD_OVERRIDE_SENTINEL: u8 = 99;

/// Адрес первого слота скорости
pub const BAUD_SLOT_BASE: u8 = 3;

/// Длина образа записи (адреса 0..=7)
pub const RECORD_LEN: usize = 8;

/// Поддерживаемые скорости консоли
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
}

impl BaudRate {
    /// В порядке слотов и клавиш подменю
    pub const ALL: [BaudRate; 5] = [
        BaudRate::B4800,
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
        BaudRate::B57600,
    ];

    pub const DEFAULT: BaudRate = BaudRate::B57600;

    pub const fn bps(self) -> u32 {
        match self {
            BaudRate::B4800 => 4_800,
            BaudRate::B9600 => 9_600,
            BaudRate::B19200 => 19_200,
            BaudRate::B38400 => 38_400,
            BaudRate::B57600 => 57_600,
        }
    }

    /// Значение, которым помечается активный слот
    pub const fn sentinel(self) -> u8 {
        match self {
            BaudRate::B4800 => 4,
            BaudRate::B9600 => 9,
            BaudRate::B19200 => 19,
            BaudRate::B38400 => 38,
            BaudRate::B57600 => 57,
        }
    }

    const fn index(self) -> usize {
        match self {
            BaudRate::B4800 => 0,
            BaudRate::B9600 => 1,
            BaudRate::B19200 => 2,
            BaudRate::B38400 => 3,
            BaudRate::B57600 => 4,
        }
    }

    pub const fn slot_address(self) -> u8 {
        BAUD_SLOT_BASE + self.index() as u8
    }

    /// Клавиши '1'..='5' подменю скоростей
    pub fn from_menu_key(key: u8) -> Option<Self> {
        match key {
            b'1'..=b'5' => Some(Self::ALL[(key - b'1') as usize]),
            _ => None,
        }
    }
}

/// Раскодированная запись конфигурации
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigRecord {
    /// Автозапуск потокового режима
    pub autorun: bool,
    /// Выбрана пользовательская скорость
    pub baud_override: bool,
    /// Сырые значения слотов скоростей
    pub slots: [u8; 5],
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            autorun: false,
            baud_override: false,
            slots: [0; 5],
        }
    }
}

impl ConfigRecord {
    pub fn decode(raw: &[u8; RECORD_LEN]) -> Self {
        let base = BAUD_SLOT_BASE as usize;
        let mut slots = [0u8; 5];
        slots.copy_from_slice(&raw[base..base + 5]);
        Self {
            autorun: raw[MODE_FLAG_ADDR as usize] == AUTORUN_SENTINEL,
            baud_override: raw[BAUD_OVERRIDE_ADDR as usize] == BAUD_OVERRIDE_SENTINEL,
            slots,
        }
    }

    /// Слоты, в которых стоит их собственный маркер
    pub fn active_slots(&self) -> impl Iterator<Item = BaudRate> + '_ {
        BaudRate::ALL
            .into_iter()
            .filter(move |rate| self.slots[rate.index()] == rate.sentinel())
    }

    /// Скорость, которую нужно применить при старте
    ///
    /// Флаг стоит, а активного слота нет (оборванная запись) — берётся
    /// скорость по умолчанию. Из нескольких активных слотов действует
    /// последний, то есть самая высокая скорость.
    pub fn resolve_baud(&self) -> BaudRate {
        if !self.baud_override {
            return BaudRate::DEFAULT;
        }
        self.active_slots().last().unwrap_or(BaudRate::DEFAULT)
    }

    /// Флаг и слоты нарушают инвариант "не больше одного активного слота"
    /// или флаг стоит без слота
    pub fn is_consistent(&self) -> bool {
        let active = self.active_slots().count();
        if self.baud_override {
            active == 1
        } else {
            active <= 1
        }
    }

    /// Образ адресов 2..=7 для выбора скорости: флаг + все пять слотов
    pub fn baud_image(rate: BaudRate) -> [u8; 6] {
        let mut image = [0u8; 6];
        image[0] = BAUD_OVERRIDE_SENTINEL;
        image[1 + rate.index()] = rate.sentinel();
        image
    }
}

/// Хранилище конфигурации поверх байтовой энергонезависимой памяти
pub struct ConfigStore<N> {
    storage: N,
}

impl<N: NvStorage> ConfigStore<N> {
    pub fn new(storage: N) -> Self {
        Self { storage }
    }

    pub fn load(&mut self) -> Result<ConfigRecord, StorageError> {
        let mut raw = [0u8; RECORD_LEN];
        self.storage.read(0, &mut raw)?;
        Ok(ConfigRecord::decode(&raw))
    }

    /// Сохранить флаг режима
    pub fn set_autorun(&mut self, autorun: bool) -> Result<(), StorageError> {
        let value = if autorun { AUTORUN_SENTINEL } else { 0 };
        self.storage.write(MODE_FLAG_ADDR, &[value])
    }

    /// Сохранить выбор скорости
    ///
    /// Флаг и все пять слотов пишутся одним обновлением, так что после
    /// вызова активен ровно один слот.
    pub fn select_baud(&mut self, rate: BaudRate) -> Result<(), StorageError> {
        self.storage
            .write(BAUD_OVERRIDE_ADDR, &ConfigRecord::baud_image(rate))?;
        log_info!("Сохранена скорость {=u32} бод", rate.bps());
        Ok(())
    }

    /// Скорость для применения при старте
    pub fn persisted_baud(&mut self) -> Result<BaudRate, StorageError> {
        let record = self.load()?;
        if !record.is_consistent() {
            log_warn!(
                "Запись скорости повреждена (флаг {=bool}), используется {=u32} бод",
                record.baud_override,
                DEFAULT_BAUDRATE
            );
        }
        Ok(record.resolve_baud())
    }
}
