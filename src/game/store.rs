use core::fmt;

use embedded_storage::{ReadStorage, Storage};

pub const HIGH_SCORE_RECORD_LEN: usize = 16;
pub const HIGH_SCORE_MAGIC: u32 = 0x5742_4853;
pub const HIGH_SCORE_VERSION: u8 = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StoreError {
    Read,
    Write,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("high score read failed"),
            Self::Write => f.write_str("high score write failed"),
        }
    }
}

/// Single persisted integer. Last write wins.
pub trait HighScoreStore {
    fn load(&mut self) -> u32;
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for &mut T {
    fn load(&mut self) -> u32 {
        (**self).load()
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        (**self).save(score)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryHighScoreStore {
    value: u32,
    saves: u32,
    fail_writes: bool,
}

impl MemoryHighScoreStore {
    pub const fn new(value: u32) -> Self {
        Self {
            value,
            saves: 0,
            fail_writes: false,
        }
    }

    pub const fn failing(value: u32) -> Self {
        Self {
            value,
            saves: 0,
            fail_writes: true,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn saves(&self) -> u32 {
        self.saves
    }

    pub fn set_external(&mut self, value: u32) {
        self.value = value;
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&mut self) -> u32 {
        self.value
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write);
        }
        self.value = score;
        self.saves = self.saves.saturating_add(1);
        Ok(())
    }
}

pub fn record_bytes(score: u32) -> [u8; HIGH_SCORE_RECORD_LEN] {
    let mut record = [0xFFu8; HIGH_SCORE_RECORD_LEN];
    record[0..4].copy_from_slice(&HIGH_SCORE_MAGIC.to_le_bytes());
    record[4] = HIGH_SCORE_VERSION;
    record[5..9].copy_from_slice(&score.to_le_bytes());
    record[HIGH_SCORE_RECORD_LEN - 1] = checksum8(&record[..HIGH_SCORE_RECORD_LEN - 1]);
    record
}

pub fn score_from_record(record: &[u8; HIGH_SCORE_RECORD_LEN]) -> Option<u32> {
    if record.iter().all(|&byte| byte == 0xFF) {
        return None;
    }
    if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != HIGH_SCORE_MAGIC {
        return None;
    }
    if record[4] != HIGH_SCORE_VERSION {
        return None;
    }
    let expected = checksum8(&record[..HIGH_SCORE_RECORD_LEN - 1]);
    if expected != record[HIGH_SCORE_RECORD_LEN - 1] {
        return None;
    }
    Some(u32::from_le_bytes([record[5], record[6], record[7], record[8]]))
}

/// High score kept in one record at `offset` of a flash partition.
/// Blank or corrupt records load as zero.
pub struct FlashHighScoreStore<F> {
    flash: F,
    offset: u32,
}

impl<F> FlashHighScoreStore<F>
where
    F: ReadStorage + Storage,
{
    pub fn new(flash: F, offset: u32) -> Self {
        Self { flash, offset }
    }

    /// Uses the last `sector_size` bytes of the partition.
    pub fn at_last_sector(flash: F, sector_size: u32) -> Self {
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(sector_size);
        Self { flash, offset }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn into_inner(self) -> F {
        self.flash
    }

    fn read_record(&mut self) -> Result<Option<u32>, StoreError> {
        let mut record = [0u8; HIGH_SCORE_RECORD_LEN];
        self.flash
            .read(self.offset, &mut record)
            .map_err(|_| StoreError::Read)?;
        Ok(score_from_record(&record))
    }
}

impl<F> HighScoreStore for FlashHighScoreStore<F>
where
    F: ReadStorage + Storage,
{
    fn load(&mut self) -> u32 {
        self.read_record().ok().flatten().unwrap_or(0)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        if matches!(self.read_record(), Ok(Some(current)) if current == score) {
            return Ok(());
        }
        let record = record_bytes(score);
        self.flash
            .write(self.offset, &record)
            .map_err(|_| StoreError::Write)
    }
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RamFlash {
        bytes: [u8; 256],
        writes: u32,
        fail: bool,
    }

    impl RamFlash {
        fn blank() -> Self {
            Self {
                bytes: [0xFF; 256],
                writes: 0,
                fail: false,
            }
        }
    }

    impl ReadStorage for RamFlash {
        type Error = ();

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            let end = start + bytes.len();
            if end > self.bytes.len() {
                return Err(());
            }
            bytes.copy_from_slice(&self.bytes[start..end]);
            Ok(())
        }

        fn capacity(&self) -> usize {
            self.bytes.len()
        }
    }

    impl Storage for RamFlash {
        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            let start = offset as usize;
            self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn blank_flash_loads_zero() {
        let mut store = FlashHighScoreStore::new(RamFlash::blank(), 0);
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn save_then_load() {
        let mut store = FlashHighScoreStore::at_last_sector(RamFlash::blank(), 64);
        assert_eq!(store.offset(), 192);
        store.save(42).expect("save");
        assert_eq!(store.load(), 42);
    }

    #[test]
    fn identical_save_is_skipped() {
        let mut store = FlashHighScoreStore::new(RamFlash::blank(), 32);
        store.save(7).expect("first save");
        store.save(7).expect("second save");
        assert_eq!(store.into_inner().writes, 1);
    }

    #[test]
    fn corrupt_record_loads_zero() {
        let mut record = record_bytes(99);
        record[6] ^= 0x10;
        assert!(score_from_record(&record).is_none());

        let mut flash = RamFlash::blank();
        flash.bytes[..HIGH_SCORE_RECORD_LEN].copy_from_slice(&record);
        let mut store = FlashHighScoreStore::new(flash, 0);
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn other_version_is_rejected() {
        let mut record = record_bytes(5);
        record[4] = 9;
        record[HIGH_SCORE_RECORD_LEN - 1] = checksum8(&record[..HIGH_SCORE_RECORD_LEN - 1]);
        assert!(score_from_record(&record).is_none());
    }

    #[test]
    fn write_failure_is_reported() {
        let mut flash = RamFlash::blank();
        flash.fail = true;
        let mut store = FlashHighScoreStore::new(flash, 0);
        assert_eq!(store.save(3), Err(StoreError::Write));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryHighScoreStore::new(4);
        assert_eq!(store.load(), 4);
        store.save(9).expect("save");
        assert_eq!(store.value(), 9);
        assert_eq!(store.saves(), 1);
        assert_eq!(MemoryHighScoreStore::failing(1).save(2), Err(StoreError::Write));
    }
}
