// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! SmartDisplay register address model.
//!
//! This module is the pure-arithmetic core of the probe: it maps abstract
//! widget indices and field offsets onto the slave's 16-bit register map,
//! and names the contiguous range that holds the current widget values.
//! It performs no I/O and has no failure modes beyond input validation.
//!
//! # Register Map
//!
//! The device exposes widget register blocks in two disjoint ranges:
//!
//! ```text
//! widget index 0..=9   ->  index * 100            (directly addressable block)
//! widget index 10..=63 ->  index * 100 + 10000    (relocated high block)
//! ```
//!
//! The split is a property of the device, not an implementation choice:
//! indices are *not* uniformly linear, and the boundary at index 10 must be
//! an explicit branch. Indices above 63 are rejected, never wrapped.
//!
//! Within a widget block, the 16-bit fields sit at fixed offsets (see
//! [`WidgetField`]). The aggregated current values are additionally mapped
//! into one contiguous table at [`VALUE_TABLE_BASE`], one register per
//! widget in ascending index order, which is what the probe reads.

use std::time::Duration;

use crate::error::AddressError;

// =============================================================================
// Device Constants
// =============================================================================

/// Modbus slave address of the SmartDisplay.
pub const SLAVE_ADDRESS: u8 = 0x7B;

/// Base register address of the aggregated widget value table.
pub const VALUE_TABLE_BASE: u16 = 2000;

/// Width of the value table in 16-bit registers (widgets 0..=9).
pub const VALUE_TABLE_WIDTH: u16 = 10;

/// Minimum reply timeout.
///
/// Headroom for the slowest supported combination (2400 bit/s ASCII).
pub const MIN_TIMEOUT: Duration = Duration::from_millis(300);

/// Default baud rate of the device.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default serial port name.
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default serial port name.
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM22";

/// Highest widget index in the directly addressable block.
pub const DIRECT_WIDGET_MAX: u8 = 9;

/// Highest addressable widget index.
pub const WIDGET_INDEX_MAX: u8 = 63;

/// Register stride between consecutive widget blocks.
const WIDGET_STRIDE: u16 = 100;

/// Offset added to blocks relocated into the high address region.
const RELOCATED_BLOCK_OFFSET: u16 = 10_000;

// =============================================================================
// Widget Fields
// =============================================================================

/// First register offset of the String/Time region inside a widget block.
pub const STRING_TIME_FIRST: u16 = 8;

/// Last register offset of the String/Time region inside a widget block.
pub const STRING_TIME_LAST: u16 = 57;

/// The 16-bit fields of a widget register block.
///
/// The offsets document the device layout; the probe itself only reads the
/// aggregated value table, so fields other than [`WidgetField::GetValue`]
/// exist for addressing diagnostics and future tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetField {
    /// Widget type identifier.
    Type,
    /// Horizontal position.
    PosX,
    /// Vertical position.
    PosY,
    /// Style selector.
    Style,
    /// Value written to the widget (Value1).
    SetValue,
    /// Current value reported by the widget (Value2).
    GetValue,
    /// One register of the String/Time region (0-based position within it).
    StringTime(u16),
}

impl WidgetField {
    /// Returns the register offset of this field inside its widget block.
    pub const fn offset(&self) -> u16 {
        match self {
            Self::Type => 0,
            Self::PosX => 2,
            Self::PosY => 3,
            Self::Style => 4,
            Self::SetValue => 6,
            Self::GetValue => 7,
            Self::StringTime(pos) => STRING_TIME_FIRST + *pos,
        }
    }
}

// =============================================================================
// Address Mapping
// =============================================================================

/// Returns the base register address of the widget block for `index`.
///
/// The mapping is the device's two-piece rule with the boundary at
/// index 10; see the module documentation.
///
/// # Errors
///
/// Returns [`AddressError::InvalidWidgetIndex`] when `index` is above
/// [`WIDGET_INDEX_MAX`].
pub fn widget_base_address(index: u8) -> Result<u16, AddressError> {
    match index {
        0..=DIRECT_WIDGET_MAX => Ok(u16::from(index) * WIDGET_STRIDE),
        10..=WIDGET_INDEX_MAX => {
            Ok(u16::from(index) * WIDGET_STRIDE + RELOCATED_BLOCK_OFFSET)
        }
        _ => Err(AddressError::InvalidWidgetIndex { index }),
    }
}

/// Returns the absolute register address of a field inside a widget block.
///
/// `offset` is one of the documented block offsets; beyond the range check
/// on `index` the offset semantics are not validated here, the field table
/// is documentation rather than an enforced contract.
///
/// # Errors
///
/// Returns [`AddressError::InvalidWidgetIndex`] when `index` is above
/// [`WIDGET_INDEX_MAX`].
pub fn field_address(index: u8, offset: u16) -> Result<u16, AddressError> {
    Ok(widget_base_address(index)? + offset)
}

/// Returns the read range of the aggregated widget value table.
///
/// Identity passthrough by design: the function names the concept so a
/// differently-mapped slave only needs different inputs, not a different
/// session. A `count` of zero is legal and describes an empty table.
pub const fn value_table_range(base: u16, count: u16) -> (u16, u16) {
    (base, count)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_block_is_linear() {
        for index in 0..=DIRECT_WIDGET_MAX {
            assert_eq!(
                widget_base_address(index).unwrap(),
                u16::from(index) * 100,
                "widget {index}"
            );
        }
    }

    #[test]
    fn test_relocated_block_carries_offset() {
        for index in 10..=WIDGET_INDEX_MAX {
            assert_eq!(
                widget_base_address(index).unwrap(),
                u16::from(index) * 100 + 10_000,
                "widget {index}"
            );
        }
    }

    #[test]
    fn test_boundary_between_blocks() {
        assert_eq!(widget_base_address(9).unwrap(), 900);
        assert_eq!(widget_base_address(10).unwrap(), 11_000);
    }

    #[test]
    fn test_out_of_range_indices_are_rejected() {
        for index in (WIDGET_INDEX_MAX + 1)..=u8::MAX {
            assert_eq!(
                widget_base_address(index),
                Err(AddressError::InvalidWidgetIndex { index }),
                "widget {index}"
            );
        }
    }

    #[test]
    fn test_field_address_adds_offset() {
        assert_eq!(field_address(0, WidgetField::Type.offset()).unwrap(), 0);
        assert_eq!(field_address(3, WidgetField::GetValue.offset()).unwrap(), 307);
        assert_eq!(field_address(10, WidgetField::SetValue.offset()).unwrap(), 11_006);
        assert_eq!(field_address(63, WidgetField::PosY.offset()).unwrap(), 16_303);
    }

    #[test]
    fn test_field_address_rejects_bad_index() {
        assert_eq!(
            field_address(64, 0),
            Err(AddressError::InvalidWidgetIndex { index: 64 })
        );
    }

    #[test]
    fn test_widget_field_offsets() {
        assert_eq!(WidgetField::Type.offset(), 0);
        assert_eq!(WidgetField::PosX.offset(), 2);
        assert_eq!(WidgetField::PosY.offset(), 3);
        assert_eq!(WidgetField::Style.offset(), 4);
        assert_eq!(WidgetField::SetValue.offset(), 6);
        assert_eq!(WidgetField::GetValue.offset(), 7);
        assert_eq!(WidgetField::StringTime(0).offset(), STRING_TIME_FIRST);
        assert_eq!(
            WidgetField::StringTime(STRING_TIME_LAST - STRING_TIME_FIRST).offset(),
            STRING_TIME_LAST
        );
    }

    #[test]
    fn test_value_table_range_is_passthrough() {
        assert_eq!(value_table_range(VALUE_TABLE_BASE, VALUE_TABLE_WIDTH), (2000, 10));
        assert_eq!(value_table_range(0, 0), (0, 0));
        assert_eq!(value_table_range(4000, 64), (4000, 64));
    }
}
