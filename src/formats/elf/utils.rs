//! Byte-order and word-width utilities.
//!
//! Fields are read from disk in host order first and corrected afterwards,
//! so the swap helpers here are the only place byte order is dealt with.

use crate::error::{ElfError, Result};
use crate::formats::elf::types::{ElfClass, ElfData};

/// Reverse the bytes of a 16-bit value.
pub fn swap16(value: u16) -> u16 {
    value.swap_bytes()
}

/// Reverse the bytes of a 32-bit value.
pub fn swap32(value: u32) -> u32 {
    value.swap_bytes()
}

/// Reverse the bytes of a 64-bit value.
pub fn swap64(value: u64) -> u64 {
    value.swap_bytes()
}

/// Reverse a promoted address-sized word at the width it had on disk.
///
/// A word promoted from ELF32 keeps its upper half zero.
pub fn swap_word(value: u64, class: ElfClass) -> u64 {
    match class {
        ElfClass::Elf32 => u64::from(swap32(value as u32)),
        ElfClass::Elf64 => swap64(value),
    }
}

/// True when fields declared in `data` order must be swapped to be usable.
pub fn needs_swap(data: ElfData) -> bool {
    !data.is_host()
}

/// Trait for reading raw host-order values out of a byte window
pub trait NativeRead {
    fn read_ne_u16(&self, offset: usize) -> Result<u16>;
    fn read_ne_u32(&self, offset: usize) -> Result<u32>;
    fn read_ne_u64(&self, offset: usize) -> Result<u64>;
}

fn window<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    offset
        .checked_add(N)
        .and_then(|end| data.get(offset..end))
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| ElfError::TruncatedFile {
            offset: offset as u64,
            needed: N as u64,
            available: data.len().saturating_sub(offset) as u64,
        })
}

impl NativeRead for [u8] {
    fn read_ne_u16(&self, offset: usize) -> Result<u16> {
        window(self, offset).map(u16::from_ne_bytes)
    }

    fn read_ne_u32(&self, offset: usize) -> Result<u32> {
        window(self, offset).map(u32::from_ne_bytes)
    }

    fn read_ne_u64(&self, offset: usize) -> Result<u64> {
        window(self, offset).map(u64::from_ne_bytes)
    }
}

/// Return the bytes before the first NUL, or `None` when there is no NUL.
pub fn until_nul(data: &[u8]) -> Option<&[u8]> {
    memchr::memchr(0, data).map(|end| &data[..end])
}
