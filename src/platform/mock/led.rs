use core::convert::Infallible;
use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};

use super::clock::SimClock;

/// Светодиод, запоминающий все переключения с отметкой времени (мс)
#[derive(Clone)]
pub struct MockLed {
    history: Rc<RefCell<Vec<(u64, bool)>>>,
    clock: SimClock,
}

impl MockLed {
    pub fn new(clock: SimClock) -> Self {
        Self {
            history: Rc::new(RefCell::new(Vec::new())),
            clock,
        }
    }

    pub fn history(&self) -> Vec<(u64, bool)> {
        self.history.borrow().clone()
    }

    pub fn is_on(&self) -> bool {
        self.history.borrow().last().map(|(_, on)| *on).unwrap_or(false)
    }

    /// Сколько раз светодиод включался
    pub fn on_count(&self) -> usize {
        self.history.borrow().iter().filter(|(_, on)| *on).count()
    }

    fn record(&self, on: bool) {
        self.history.borrow_mut().push((self.clock.now_ms(), on));
    }
}

impl ErrorType for MockLed {
    type Error = Infallible;
}

impl OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.record(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.record(true);
        Ok(())
    }
}
