//! Composite state layout
//!
//! ```text
//!  31                 K+1   K   K-1             0
//! +-----------------------+---+------------------+
//! |   secondary state     | A |   host state     |
//! +-----------------------+---+------------------+
//! ```
//!
//! `K` is the host scanner's state width and `A` is set while a secondary
//! lexer is active. The secondary state is stored verbatim; when `A` is clear
//! the high bits are zero.

use crate::logging::codes;
use crate::log_error;
use std::sync::atomic::{AtomicBool, Ordering};

static CAPACITY_REPORTED: AtomicBool = AtomicBool::new(false);

/// Host state plus the secondary state, if a secondary lexer was active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedState {
    pub host: u32,
    pub secondary: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLayout {
    host_bits: u32,
}

impl StateLayout {
    pub const fn new(host_bits: u32) -> Self {
        assert!(host_bits < 31, "host state must leave room for the active flag");
        Self { host_bits }
    }

    pub fn host_bits(&self) -> u32 {
        self.host_bits
    }

    pub fn host_mask(&self) -> u32 {
        (1 << self.host_bits) - 1
    }

    pub fn active_flag(&self) -> u32 {
        1 << self.host_bits
    }

    pub fn secondary_shift(&self) -> u32 {
        self.host_bits + 1
    }

    /// Largest secondary state that survives encoding
    pub fn secondary_capacity(&self) -> u32 {
        u32::MAX >> self.secondary_shift()
    }

    pub fn encode(&self, host: u32, secondary: Option<u32>) -> u32 {
        debug_assert!(
            host <= self.host_mask(),
            "host state {host:#x} exceeds {} bits",
            self.host_bits
        );
        let host = host & self.host_mask();

        match secondary {
            None => host,
            Some(secondary) => {
                if secondary > self.secondary_capacity() {
                    self.report_overflow(secondary);
                }
                host | self.active_flag() | (secondary << self.secondary_shift())
            }
        }
    }

    pub fn decode(&self, state: u32) -> DecodedState {
        let host = state & self.host_mask();
        let secondary = (state & self.active_flag() != 0).then(|| state >> self.secondary_shift());
        DecodedState { host, secondary }
    }

    fn report_overflow(&self, secondary: u32) {
        debug_assert!(
            false,
            "secondary state {secondary:#x} exceeds {} bits",
            32 - self.secondary_shift()
        );
        if !CAPACITY_REPORTED.swap(true, Ordering::Relaxed) {
            log_error!(
                codes::embedding::STATE_CAPACITY_EXCEEDED,
                "Secondary lexer state truncated",
                "state" => format!("{secondary:#x}"),
                "capacity" => format!("{:#x}", self.secondary_capacity())
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: StateLayout = StateLayout::new(13);

    #[test]
    fn test_host_only_round_trip() {
        for host in [0, 1, 0x0abc, 0x1fff] {
            let state = LAYOUT.encode(host, None);
            assert_eq!(state, host);
            assert_eq!(
                LAYOUT.decode(state),
                DecodedState {
                    host,
                    secondary: None
                }
            );
        }
    }

    #[test]
    fn test_embedded_round_trip() {
        for (host, secondary) in [(0, 0), (0x1fff, 0), (5, 1), (0x0123, 0x3ffff)] {
            let state = LAYOUT.encode(host, Some(secondary));
            assert_ne!(state & LAYOUT.active_flag(), 0);
            assert_eq!(
                LAYOUT.decode(state),
                DecodedState {
                    host,
                    secondary: Some(secondary)
                }
            );
        }
    }

    #[test]
    fn test_bit_positions() {
        assert_eq!(LAYOUT.active_flag(), 1 << 13);
        assert_eq!(LAYOUT.encode(3, Some(2)), 3 | (1 << 13) | (2 << 14));
        assert_eq!(LAYOUT.secondary_capacity(), (1 << 18) - 1);
    }

    #[test]
    fn test_inactive_state_has_zero_high_bits() {
        let decoded = LAYOUT.decode(0x0fff);
        assert_eq!(decoded.secondary, None);
        assert_eq!(LAYOUT.encode(decoded.host, decoded.secondary) >> 13, 0);
    }
}
