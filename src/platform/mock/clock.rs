use std::cell::Cell;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;

/// Предел по умолчанию: тест, ждущий дольше, где-то завис
const DEFAULT_LIMIT_MS: u64 = 10 * 60 * 1000;

/// Модельное время, общее для задержек и порта
#[derive(Clone)]
pub struct SimClock {
    now_ns: Rc<Cell<u64>>,
    limit_ns: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            now_ns: Rc::new(Cell::new(0)),
            limit_ns: DEFAULT_LIMIT_MS * 1_000_000,
        }
    }

    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }

    pub fn advance_ns(&self, ns: u64) {
        let now = self.now_ns.get() + ns;
        assert!(
            now <= self.limit_ns,
            "simulated clock passed {} ms: firmware is waiting for input that never comes",
            self.limit_ns / 1_000_000
        );
        self.now_ns.set(now);
    }
}

/// Асинхронная задержка, двигающая модельное время
#[derive(Clone)]
pub struct MockDelay {
    clock: SimClock,
}

impl MockDelay {
    pub fn new(clock: SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(ms as u64 * 1_000_000);
    }
}
