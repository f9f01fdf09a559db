use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::clock::SimClock;
use crate::config::hardware::frequencies::DEFAULT_BAUDRATE;
use crate::platform::{SerialError, SerialPort};

struct Line {
    output: Vec<u8>,
    /// Входящие байты с модельным временем появления (мс)
    input: VecDeque<(u64, u8)>,
    baudrate: u32,
    /// (смещение в выводе, новая скорость) для каждой смены скорости
    baud_changes: Vec<(usize, u32)>,
}

/// Порт с заранее расписанным входом
#[derive(Clone)]
pub struct MockSerial {
    line: Rc<RefCell<Line>>,
    clock: SimClock,
}

impl MockSerial {
    pub fn new(clock: SimClock) -> Self {
        Self {
            line: Rc::new(RefCell::new(Line {
                output: Vec::new(),
                input: VecDeque::new(),
                baudrate: DEFAULT_BAUDRATE,
                baud_changes: Vec::new(),
            })),
            clock,
        }
    }

    /// Байт, доступный сразу
    pub fn push(&self, byte: u8) {
        let now = self.clock.now_ms();
        self.push_at(now, byte);
    }

    pub fn push_str(&self, text: &str) {
        for byte in text.bytes() {
            self.push(byte);
        }
    }

    /// Байт, который "придёт" в момент `at_ms` модельного времени
    pub fn push_at(&self, at_ms: u64, byte: u8) {
        self.line.borrow_mut().input.push_back((at_ms, byte));
    }

    /// Байт, который "придёт" через `delay_ms` от текущего момента
    pub fn push_after(&self, delay_ms: u64, byte: u8) {
        let at = self.clock.now_ms() + delay_ms;
        self.push_at(at, byte);
    }

    pub fn pending_input(&self) -> usize {
        self.line.borrow().input.len()
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.line.borrow().output).into_owned()
    }

    /// Забрать вывод, накопленный с прошлого вызова
    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut self.line.borrow_mut().output);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn baudrate(&self) -> u32 {
        self.line.borrow().baudrate
    }

    pub fn baud_changes(&self) -> Vec<(usize, u32)> {
        self.line.borrow().baud_changes.clone()
    }
}

impl SerialPort for MockSerial {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.line.borrow_mut().output.extend_from_slice(bytes);
        Ok(())
    }

    fn try_read(&mut self) -> Result<Option<u8>, SerialError> {
        let now = self.clock.now_ms();
        let mut line = self.line.borrow_mut();
        match line.input.front() {
            Some(&(at, byte)) if at <= now => {
                line.input.pop_front();
                Ok(Some(byte))
            }
            _ => Ok(None),
        }
    }

    fn set_baudrate(&mut self, baudrate: u32) -> Result<(), SerialError> {
        let mut line = self.line.borrow_mut();
        let offset = line.output.len();
        line.baudrate = baudrate;
        line.baud_changes.push((offset, baudrate));
        Ok(())
    }
}
