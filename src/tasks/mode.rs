//! Автомат режимов: меню и потоковый режим
//!
//! Режим сохраняется в энергонезависимой памяти и переживает
//! перезагрузку. Ctrl+Z переключает режим с любого экрана: байт,
//! прервавший цикл показа или справку, не теряется, а исполняется как
//! следующая команда меню.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use super::menu::{self, Screen};
use super::streaming::{self, StreamSession};
use super::{self_test, AppError};
use crate::config::hardware::keys;
use crate::config::hardware::timing::{BAUD_SWITCH_DRAIN_MS, ERROR_RETRY_MS};
use crate::config::persisted::{BaudRate, ConfigRecord, ConfigStore};
use crate::console::Console;
use crate::data::SelfTestReport;
use crate::drivers::TwoWireBus;
use crate::platform::{NvStorage, SerialPort};
use crate::sensors::SensorSuite;

/// Текущий режим работы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Menu,
    Streaming,
}

pub struct App<B, S, N, L, D> {
    sensors: SensorSuite<B>,
    console: Console<S>,
    store: ConfigStore<N>,
    led: L,
    delay: D,
    mode: Mode,
    baud: BaudRate,
    /// Байт, прервавший предыдущий экран, исполняется следующим
    pending: Option<u8>,
    session: StreamSession,
    last_self_test: SelfTestReport,
}

impl<B, S, N, L, D> App<B, S, N, L, D>
where
    B: TwoWireBus,
    S: SerialPort,
    N: NvStorage,
    L: OutputPin,
    D: DelayNs,
{
    /// Старт платы: скорость порта, датчики, самотестирование, режим
    ///
    /// Ошибки на этом этапе только журналируются: прошивка всегда
    /// доходит до автомата режимов.
    pub async fn boot(bus: B, port: S, storage: N, led: L, delay: D) -> Self {
        let mut store = ConfigStore::new(storage);
        let record = match store.load() {
            Ok(record) => record,
            Err(e) => {
                log_error!("Не удалось прочитать конфигурацию: {}", e);
                ConfigRecord::default()
            }
        };
        let baud = match store.persisted_baud() {
            Ok(baud) => baud,
            Err(_) => record.resolve_baud(),
        };

        let mut app = Self {
            sensors: SensorSuite::new(bus),
            console: Console::new(port),
            store,
            led,
            delay,
            mode: if record.autorun { Mode::Streaming } else { Mode::Menu },
            baud,
            pending: None,
            session: StreamSession::new(),
            last_self_test: SelfTestReport::default(),
        };

        if let Err(e) = app.console.set_baudrate(baud.bps()) {
            log_error!("Не удалось установить скорость {=u32}: {}", baud.bps(), e);
        }
        log_info!("Скорость консоли {=u32} бод", baud.bps());

        if let Err(e) = app.sensors.init_all(&mut app.delay).await {
            log_warn!("Инициализация датчиков с ошибкой: {}", e);
        }

        match self_test::run(&mut app.sensors, &mut app.console, &mut app.led, &mut app.delay).await {
            Ok(report) => app.last_self_test = report,
            Err(e) => log_error!("Не удалось вывести отчёт самотестирования: {}", e),
        }

        log_info!("Режим после старта: {}", app.mode);
        app
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn baud(&self) -> BaudRate {
        self.baud
    }

    pub fn last_self_test(&self) -> SelfTestReport {
        self.last_self_test
    }

    /// Один шаг автомата
    ///
    /// В меню: показать меню и исполнить одну команду. В потоковом
    /// режиме: выдавать кадры до Ctrl+Z.
    pub async fn step(&mut self) -> Result<(), AppError> {
        match self.mode {
            Mode::Menu => self.menu_step().await,
            Mode::Streaming => self.stream_step().await,
        }
    }

    /// Шаг, после ошибки которого режим повторяется с паузой
    pub async fn supervised_step(&mut self) {
        if let Err(e) = self.step().await {
            log_error!("Ошибка в режиме {}: {}", self.mode, e);
            self.delay.delay_ms(ERROR_RETRY_MS).await;
        }
    }

    /// Бесконечный цикл; ошибки журналируются, режим продолжается
    pub async fn run(mut self) -> ! {
        loop {
            self.supervised_step().await;
        }
    }

    async fn menu_step(&mut self) -> Result<(), AppError> {
        if let Err(e) = self.sensors.reinit_accel_mag() {
            log_warn!("Повторная настройка датчиков: {}", e);
        }
        menu::render_menu(&mut self.console, self.baud)?;

        let command = match self.pending.take() {
            Some(byte) => byte,
            None => self.console.read_byte(&mut self.delay).await?,
        };
        self.dispatch(command).await
    }

    async fn dispatch(&mut self, command: u8) -> Result<(), AppError> {
        if let Some(screen) = Screen::from_key(command) {
            self.console.write_str("\r\n")?;
            let byte = menu::show(screen, &mut self.sensors, &mut self.console, &mut self.delay).await?;
            self.pending = Some(byte);
            return Ok(());
        }

        match command {
            b'5' => self.baud_menu().await,
            keys::SELF_TEST => {
                self.last_self_test =
                    self_test::run(&mut self.sensors, &mut self.console, &mut self.led, &mut self.delay)
                        .await?;
                Ok(())
            }
            keys::TOGGLE_AUTORUN => self.enter_streaming(),
            keys::HELP => {
                menu::render_help(&mut self.console)?;
                let byte = self.console.read_byte(&mut self.delay).await?;
                self.pending = Some(byte);
                Ok(())
            }
            _ => {
                log_debug!("Неизвестная команда {=u8:#x}", command);
                Ok(())
            }
        }
    }

    async fn baud_menu(&mut self) -> Result<(), AppError> {
        menu::render_baud_menu(&mut self.console)?;
        let key = self.console.read_byte(&mut self.delay).await?;
        match BaudRate::from_menu_key(key) {
            Some(rate) => self.select_baud(rate).await,
            // Любая другая клавиша: назад в меню
            None => Ok(()),
        }
    }

    /// Сохранить скорость, объявить её и сразу применить
    pub async fn select_baud(&mut self, rate: BaudRate) -> Result<(), AppError> {
        self.store.select_baud(rate)?;
        self.console
            .print(format_args!("!change baud rate to {}bps!\r\n", rate.bps()))?;
        // Сообщение должно уйти на старой скорости
        self.delay.delay_ms(BAUD_SWITCH_DRAIN_MS).await;
        self.console.set_baudrate(rate.bps())?;
        self.baud = rate;
        Ok(())
    }

    fn enter_streaming(&mut self) -> Result<(), AppError> {
        self.mode = Mode::Streaming;
        self.session = StreamSession::new();
        log_info!("Переход в потоковый режим");
        self.store.set_autorun(true)?;
        Ok(())
    }

    async fn stream_step(&mut self) -> Result<(), AppError> {
        loop {
            let byte = streaming::run(
                &mut self.session,
                &mut self.sensors,
                &mut self.console,
                &mut self.delay,
            )
            .await?;
            if byte == keys::TOGGLE_AUTORUN {
                break;
            }
            // Любой другой байт поглощается, поток продолжается
            log_trace!("Поток: байт {=u8:#x} пропущен", byte);
        }

        self.mode = Mode::Menu;
        log_info!("Переход в меню");
        self.store.set_autorun(false)?;
        Ok(())
    }
}
