// Byte layout of an arena image.
//
//   [ Table: MAX_QUEUES x SLOT_WIDTH ][ UsageCounter: COUNTER_WIDTH ][ Data ... ]
//
// All multi-byte fields are little-endian so an image written by one process
// decodes identically in every process that maps the same region.

/// The maximum number of queues that can live in one arena.
/// This must be a constant so the table has a fixed size in the image.
pub const MAX_QUEUES: usize = 64;

/// Width in bytes of one table slot record.
pub const SLOT_WIDTH: usize = std::mem::size_of::<u16>();

/// Width in bytes of the usage counter.
pub const COUNTER_WIDTH: usize = std::mem::size_of::<u16>();

/// Width of one copy unit used when relocating queue data.
pub const CHUNK_WIDTH: usize = std::mem::size_of::<u32>();

/// Per-queue slack consumed by the chunked shift. A queue with no elements
/// still reserves this many bytes in the data region.
pub const OVERHEAD: u16 = (CHUNK_WIDTH - 1) as u16;

/// Byte offset of the usage counter inside the image.
pub const USAGE_INDEX: usize = SLOT_WIDTH * MAX_QUEUES;

/// Byte offset at which the data region begins.
pub const DATA_START: u16 = (USAGE_INDEX + COUNTER_WIDTH) as u16;

/// Slot word marking a table entry with no queue.
pub const UNUSED_SLOT: u16 = 0xFFFF;

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: u16 = 2048;

/// Smallest capacity that can host at least one queue.
pub const MIN_CAPACITY: u16 = DATA_START + OVERHEAD + 2;

/// Largest capacity the 16-bit usage counter can describe.
pub const MAX_CAPACITY: u16 = u16::MAX;

/// Decoded state of one table slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// No queue occupies this slot.
    Unused,
    /// Reserved span length in bytes, logical length plus `OVERHEAD`.
    Size(u16),
}

impl SlotState {
    #[inline]
    pub fn is_unused(self) -> bool {
        matches!(self, SlotState::Unused)
    }

    /// Reserved span length, zero for an unused slot.
    #[inline]
    pub fn span(self) -> u16 {
        match self {
            SlotState::Unused => 0,
            SlotState::Size(n) => n,
        }
    }

    #[inline]
    fn to_word(self) -> u16 {
        match self {
            SlotState::Unused => UNUSED_SLOT,
            SlotState::Size(n) => n,
        }
    }

    #[inline]
    fn from_word(word: u16) -> Self {
        if word == UNUSED_SLOT {
            SlotState::Unused
        } else {
            SlotState::Size(word)
        }
    }
}

#[inline]
fn slot_offset(index: usize) -> usize {
    debug_assert!(index < MAX_QUEUES);
    index * SLOT_WIDTH
}

#[inline]
fn read_u16(image: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([image[at], image[at + 1]])
}

#[inline]
fn write_u16(image: &mut [u8], at: usize, value: u16) {
    image[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

/// Decode the slot record at `index`.
#[inline]
pub fn read_slot(image: &[u8], index: usize) -> SlotState {
    SlotState::from_word(read_u16(image, slot_offset(index)))
}

/// Encode `state` into the slot record at `index`.
#[inline]
pub fn write_slot(image: &mut [u8], index: usize, state: SlotState) {
    write_u16(image, slot_offset(index), state.to_word());
}

/// Decode the usage counter.
#[inline]
pub fn read_usage(image: &[u8]) -> u16 {
    read_u16(image, USAGE_INDEX)
}

/// Encode the usage counter.
#[inline]
pub fn write_usage(image: &mut [u8], usage: u16) {
    write_u16(image, USAGE_INDEX, usage);
}

/// Reset the table to all-unused and the counter to `DATA_START`.
/// The data region is left as-is; nothing in it is live afterwards.
pub fn initialize(image: &mut [u8]) {
    for index in 0..MAX_QUEUES {
        write_slot(image, index, SlotState::Unused);
    }
    write_usage(image, DATA_START);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_offsets() {
        assert_eq!(USAGE_INDEX, 128);
        assert_eq!(DATA_START, 130);
        assert_eq!(OVERHEAD, 3);
        assert_eq!(MIN_CAPACITY, 135);
    }

    #[test]
    fn test_slot_encoding_is_little_endian() {
        let mut image = vec![0u8; DEFAULT_CAPACITY as usize];
        write_slot(&mut image, 1, SlotState::Size(0x0104));
        assert_eq!(&image[2..4], &[0x04, 0x01]);
        assert_eq!(read_slot(&image, 1), SlotState::Size(0x0104));

        write_slot(&mut image, 1, SlotState::Unused);
        assert_eq!(&image[2..4], &[0xFF, 0xFF]);
        assert!(read_slot(&image, 1).is_unused());
    }

    #[test]
    fn test_initialize() {
        let mut image = vec![0xAAu8; DEFAULT_CAPACITY as usize];
        initialize(&mut image);
        assert!((0..MAX_QUEUES).all(|i| read_slot(&image, i) == SlotState::Unused));
        assert_eq!(read_usage(&image), DATA_START);
        assert_eq!(&image[USAGE_INDEX..USAGE_INDEX + 2], &DATA_START.to_le_bytes());
    }
}
