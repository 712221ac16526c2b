//! RGBC color samples and their fixed 8-byte wire layout.
//!
//! ```text
//! offset  0      2      4      6      8
//!         | clear | red  | green | blue |   each u16, little-endian
//! ```
//!
//! This is both the order in which the sensor returns its data registers
//! (CDATAL..BDATAH) and the payload delivered to callers of the read request.

use std::fmt;

/// One reading of the four photodiode channels, as raw ADC counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSample {
    pub clear: u16,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl ColorSample {
    /// Size of the encoded sample in bytes.
    pub const WIRE_SIZE: usize = 8;

    pub const fn new(clear: u16, red: u16, green: u16, blue: u16) -> Self {
        Self {
            clear,
            red,
            green,
            blue,
        }
    }

    /// Decode a sample from the sensor's data register block.
    pub fn from_le_bytes(bytes: [u8; Self::WIRE_SIZE]) -> Self {
        Self {
            clear: u16::from_le_bytes([bytes[0], bytes[1]]),
            red: u16::from_le_bytes([bytes[2], bytes[3]]),
            green: u16::from_le_bytes([bytes[4], bytes[5]]),
            blue: u16::from_le_bytes([bytes[6], bytes[7]]),
        }
    }

    /// Encode the sample into the caller-facing wire layout.
    pub fn to_le_bytes(&self) -> [u8; Self::WIRE_SIZE] {
        let mut out = [0u8; Self::WIRE_SIZE];
        out[0..2].copy_from_slice(&self.clear.to_le_bytes());
        out[2..4].copy_from_slice(&self.red.to_le_bytes());
        out[4..6].copy_from_slice(&self.green.to_le_bytes());
        out[6..8].copy_from_slice(&self.blue.to_le_bytes());
        out
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "clear={} red={} green={} blue={}",
            self.clear, self.red, self.green, self.blue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_channel_order() {
        let sample =
            ColorSample::from_le_bytes([0x10, 0x00, 0x20, 0x00, 0x30, 0x00, 0x40, 0x00]);
        assert_eq!(sample, ColorSample::new(0x0010, 0x0020, 0x0030, 0x0040));
    }

    #[test]
    fn test_decode_is_little_endian() {
        // High bytes land in the upper half of each channel
        let sample =
            ColorSample::from_le_bytes([0x34, 0x12, 0xff, 0xff, 0x00, 0x80, 0x01, 0x00]);
        assert_eq!(sample.clear, 0x1234);
        assert_eq!(sample.red, 0xffff);
        assert_eq!(sample.green, 0x8000);
        assert_eq!(sample.blue, 0x0001);
    }

    #[test]
    fn test_encode_round_trip() {
        let sample = ColorSample::new(0xbeef, 0x0102, 0xa5a5, 0x7f00);
        let bytes = sample.to_le_bytes();
        assert_eq!(bytes, [0xef, 0xbe, 0x02, 0x01, 0xa5, 0xa5, 0x00, 0x7f]);
        assert_eq!(ColorSample::from_le_bytes(bytes), sample);
    }

    #[test]
    fn test_display() {
        let sample = ColorSample::new(100, 40, 35, 20);
        assert_eq!(sample.to_string(), "clear=100 red=40 green=35 blue=20");
    }
}
