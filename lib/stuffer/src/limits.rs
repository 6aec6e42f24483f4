use serde::{Deserialize, Serialize};

use crate::error::{Result, StufferError};

/// The largest transfer a single `read(2)` or `write(2)` call is asked to
/// perform, bounded by both `ssize_t` and the 32-bit byte count.
pub const PLATFORM_MAX_SINGLE_TRANSFER: u32 = if (isize::MAX as u64) < (u32::MAX as u64) {
    isize::MAX as u32
} else {
    u32::MAX
};

/// Per-call limits applied to descriptor transfers.
///
/// ```
/// # use stuffer::TransferLimits;
/// let limits = TransferLimits::new(4096).unwrap();
/// assert_eq!(limits.clamp(10_000), 4096);
/// assert_eq!(limits.clamp(100), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTransferLimits")]
pub struct TransferLimits {
    /// Upper bound on the bytes moved by one system call. Values above the
    /// platform limit are lowered to it. Never zero.
    max_single_transfer: u32,
}

/// The unchecked shape of [`TransferLimits`] as it appears in configuration.
#[derive(Deserialize)]
#[serde(default)]
struct RawTransferLimits {
    max_single_transfer: u32,
}

impl Default for RawTransferLimits {
    fn default() -> Self {
        Self {
            max_single_transfer: PLATFORM_MAX_SINGLE_TRANSFER,
        }
    }
}

impl TryFrom<RawTransferLimits> for TransferLimits {
    type Error = StufferError;

    fn try_from(raw: RawTransferLimits) -> Result<Self> {
        Self::new(raw.max_single_transfer)
    }
}

impl Default for TransferLimits {
    fn default() -> Self {
        Self {
            max_single_transfer: PLATFORM_MAX_SINGLE_TRANSFER,
        }
    }
}

impl TransferLimits {
    pub fn new(max_single_transfer: u32) -> Result<Self> {
        let limits = Self {
            max_single_transfer,
        };
        limits.validate()?;
        Ok(limits)
    }

    /// Reject limits that would never let a byte through.
    pub fn validate(&self) -> Result<()> {
        if self.max_single_transfer == 0 {
            return Err(StufferError::InvalidLimits);
        }
        Ok(())
    }

    /// The effective per-call cap.
    pub fn max_single_transfer(&self) -> u32 {
        self.max_single_transfer.min(PLATFORM_MAX_SINGLE_TRANSFER)
    }

    /// Clamp a requested length to what one system call may move.
    pub fn clamp(&self, len: u32) -> u32 {
        len.min(self.max_single_transfer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_platform_limit() {
        let limits = TransferLimits::default();
        assert_eq!(limits.max_single_transfer(), PLATFORM_MAX_SINGLE_TRANSFER);
        assert_eq!(limits.clamp(u32::MAX), PLATFORM_MAX_SINGLE_TRANSFER);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(matches!(
            TransferLimits::new(0),
            Err(StufferError::InvalidLimits)
        ));
    }

    #[test]
    fn test_parse_from_toml() {
        let limits: TransferLimits = toml::from_str("max_single_transfer = 512").unwrap();
        assert_eq!(limits.clamp(1024), 512);

        let limits: TransferLimits = toml::from_str("").unwrap();
        assert_eq!(limits, TransferLimits::default());
    }

    #[test]
    fn test_zero_limit_in_config_is_rejected() {
        let err = toml::from_str::<TransferLimits>("max_single_transfer = 0").unwrap_err();
        assert!(
            err.to_string()
                .contains("transfer limits must allow at least one byte per call"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_serialized_limits_parse_back() {
        let limits = TransferLimits::new(2048).unwrap();
        let text = toml::to_string(&limits).unwrap();
        let parsed: TransferLimits = toml::from_str(&text).unwrap();
        assert_eq!(parsed, limits);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_platform_limit_is_u32_max_on_64_bit() {
        assert_eq!(PLATFORM_MAX_SINGLE_TRANSFER, u32::MAX);
    }
}
