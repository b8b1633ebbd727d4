//! Utility functions for register address and value arithmetic.
//!
//! These are the checks and bit operations the register map applies to every
//! access; they are public so custom front ends can apply the same rules.

use crate::regmap::RegmapError;

/// Validates a register address against a map's layout.
///
/// # Arguments
/// * `reg` - Register address
/// * `stride` - Distance between consecutive registers; addresses must be a multiple of it
/// * `max_register` - Highest valid register address
///
/// # Errors
/// * [`RegmapError::InvalidAddress`] - if `reg` exceeds `max_register` or is misaligned
///
/// # Example
/// ```
/// use embedded_regmap::regmap::{RegmapError, helpers::check_reg};
///
/// assert_eq!(check_reg(0x8004, 4, 0xFFFF), Ok(()));
/// assert_eq!(check_reg(0x8006, 4, 0xFFFF), Err(RegmapError::InvalidAddress));
/// assert_eq!(check_reg(0x9000, 4, 0x8FFC), Err(RegmapError::InvalidAddress));
/// ```
pub fn check_reg(reg: u16, stride: u16, max_register: u16) -> Result<(), RegmapError> {
    if reg > max_register || reg % stride != 0 {
        return Err(RegmapError::InvalidAddress);
    }
    Ok(())
}

/// Merges `val` into `orig` under `mask`.
#[inline]
pub const fn merge_bits(orig: u32, mask: u32, val: u32) -> u32 {
    (orig & !mask) | (val & mask)
}

#[test]
fn check_reg_edge_cases() {
    // Stride of one accepts everything up to max
    assert_eq!(check_reg(0xFFFF, 1, 0xFFFF), Ok(()));

    // Last aligned register
    assert_eq!(check_reg(0xFFFC, 4, 0xFFFF), Ok(()));

    // Exactly max_register
    assert_eq!(check_reg(0x0100, 4, 0x0100), Ok(()));
    assert_eq!(check_reg(0x0104, 4, 0x0100), Err(RegmapError::InvalidAddress));

    // Misaligned
    assert_eq!(check_reg(0x0001, 4, 0xFFFF), Err(RegmapError::InvalidAddress));
}

#[test]
fn merge_bits_cases() {
    assert_eq!(merge_bits(0xFFFF_0000, 0x0000_FF00, 0x0000_1200), 0xFFFF_1200);
    // Bits outside the mask in val are ignored
    assert_eq!(merge_bits(0, 0x0F, 0xFF), 0x0F);
    assert_eq!(merge_bits(0xAAAA_AAAA, 0, 0x5555_5555), 0xAAAA_AAAA);
}
