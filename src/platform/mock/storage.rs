use std::cell::RefCell;
use std::rc::Rc;

use crate::config::hardware::storage::EEPROM_SIZE;
use crate::platform::{NvStorage, StorageError};

struct Cells {
    bytes: [u8; EEPROM_SIZE],
    writes: usize,
}

/// "EEPROM" в ОЗУ; клон смотрит в ту же память (перезагрузка платы)
#[derive(Clone)]
pub struct MemStorage {
    cells: Rc<RefCell<Cells>>,
}

impl MemStorage {
    /// Стёртая память: все байты 0xFF
    pub fn erased() -> Self {
        Self {
            cells: Rc::new(RefCell::new(Cells {
                bytes: [0xFF; EEPROM_SIZE],
                writes: 0,
            })),
        }
    }

    pub fn peek(&self, address: u8) -> u8 {
        self.cells.borrow().bytes[address as usize]
    }

    /// Записать байт в обход `NvStorage` (оборванная запись, ручная порча)
    pub fn poke(&self, address: u8, value: u8) {
        self.cells.borrow_mut().bytes[address as usize] = value;
    }

    /// Количество вызовов `write`
    pub fn write_count(&self) -> usize {
        self.cells.borrow().writes
    }
}

fn range(address: u8, len: usize) -> Result<core::ops::Range<usize>, StorageError> {
    let start = address as usize;
    let end = start + len;
    if end > EEPROM_SIZE {
        return Err(StorageError::OutOfRange);
    }
    Ok(start..end)
}

impl NvStorage for MemStorage {
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), StorageError> {
        let range = range(address, buf.len())?;
        buf.copy_from_slice(&self.cells.borrow().bytes[range]);
        Ok(())
    }

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), StorageError> {
        let range = range(address, data.len())?;
        let mut cells = self.cells.borrow_mut();
        cells.bytes[range].copy_from_slice(data);
        cells.writes += 1;
        Ok(())
    }
}
