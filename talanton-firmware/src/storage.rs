//! Gain-setting persistence
//!
//! Uses sequential-storage for wear-leveled key-value storage in the
//! last 16KB of flash. The payload is a single byte, but going through
//! the map keeps the decode step explicit and the sector wear spread
//! out across a setting that gets rewritten on every repair.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on Pico-class boards
const SETTINGS_PARTITION_SIZE: usize = 4 * ERASE_SIZE; // 16KB for settings
const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

/// Flash range for the settings partition
const SETTINGS_RANGE: core::ops::Range<u32> =
    (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Storage keys for persisted settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
#[repr(u8)]
enum StorageKey {
    /// Amplifier gain byte (64 or 128)
    GainSetting = 0,
}

impl map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = *self as u8;
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        match buffer.first() {
            Some(0) => Ok((StorageKey::GainSetting, 1)),
            Some(_) => Err(sequential_storage::map::SerializationError::InvalidFormat),
            None => Err(sequential_storage::map::SerializationError::BufferTooSmall),
        }
    }
}

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum StorageError {
    /// Underlying flash or map operation failed
    Storage,
}

/// Flash-backed settings store
pub struct SettingsStore<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> SettingsStore<'d> {
    /// Create a settings store over the flash peripheral
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Read the stored gain byte
    ///
    /// `Ok(None)` means storage is healthy but holds no usable value
    /// (first boot, erased flash, or a malformed entry).
    pub async fn read_gain(&mut self) -> Result<Option<u8>, StorageError> {
        let mut data_buffer = [0u8; 64];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &StorageKey::GainSetting,
        )
        .await;

        match result {
            Ok(Some([byte])) => Ok(Some(*byte)),
            Ok(_) => Ok(None),
            Err(_) => Err(StorageError::Storage),
        }
    }

    /// Persist the gain byte
    pub async fn write_gain(&mut self, value: u8) -> Result<(), StorageError> {
        let mut data_buffer = [0u8; 64];
        let payload = [value];

        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            &StorageKey::GainSetting,
            &payload.as_slice(),
        )
        .await
        .map_err(|_| StorageError::Storage)
    }
}
