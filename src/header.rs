//! Option header shared by all SOME/IP-SD option kinds.
//!
//! [`OptionHeader`] is a zero-copy view over the four header bytes,
//! [`OptionHeaderRepr`] the owned form used by the option codecs.

use crate::error::Error;
use crate::field;
use crate::wire::{ByteSink, Reader, Result};
use byteorder::{ByteOrder, NetworkEndian};

/// Option type enumeration for SOME/IP-SD options.
///
/// Defines the type field in option headers which determines how to
/// interpret the option payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OptionType {
    /// Configuration option (0x01) - length-prefixed key=value records
    Configuration = 0x01,
    /// Load balancing option (0x02) - Priority and weight for load balancing
    LoadBalancing = 0x02,
    /// IPv4 endpoint option (0x04) - IPv4 address and port
    IPv4Endpoint = 0x04,
    /// IPv6 endpoint option (0x06) - IPv6 address and port
    IPv6Endpoint = 0x06,
    /// IPv4 multicast option (0x14) - IPv4 multicast address and port
    IPv4Multicast = 0x14,
    /// IPv6 multicast option (0x16) - IPv6 multicast address and port
    IPv6Multicast = 0x16,
    /// IPv4 SD endpoint option (0x24) - IPv4 address and port for SD messages
    IPv4SdEndpoint = 0x24,
    /// IPv6 SD endpoint option (0x26) - IPv6 address and port for SD messages
    IPv6SdEndpoint = 0x26,
}

impl OptionType {
    /// Convert a u8 value to an OptionType.
    ///
    /// # Returns
    /// * `Some(OptionType)` if value matches a known option type
    /// * `None` if value is not a valid option type
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(OptionType::Configuration),
            0x02 => Some(OptionType::LoadBalancing),
            0x04 => Some(OptionType::IPv4Endpoint),
            0x06 => Some(OptionType::IPv6Endpoint),
            0x14 => Some(OptionType::IPv4Multicast),
            0x16 => Some(OptionType::IPv6Multicast),
            0x24 => Some(OptionType::IPv4SdEndpoint),
            0x26 => Some(OptionType::IPv6SdEndpoint),
            _ => None,
        }
    }

    /// Convert the OptionType to its u8 representation.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Whether options of this type carry an IPv4 address payload.
    pub fn is_ipv4_endpoint(&self) -> bool {
        matches!(
            self,
            OptionType::IPv4Endpoint | OptionType::IPv4Multicast | OptionType::IPv4SdEndpoint
        )
    }

    /// Whether options of this type carry an IPv6 address payload.
    pub fn is_ipv6_endpoint(&self) -> bool {
        matches!(
            self,
            OptionType::IPv6Endpoint | OptionType::IPv6Multicast | OptionType::IPv6SdEndpoint
        )
    }
}

/// 1-bit discardable flag + 7 reserved bits packed into a u8.
///
/// The discardable flag indicates whether an option can be safely ignored
/// by receivers that don't understand it. The remaining 7 bits are reserved
/// and should be set to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscardableFlag(u8);

impl DiscardableFlag {
    /// Create a new DiscardableFlag with all bits set to 0.
    pub fn new() -> Self {
        DiscardableFlag(0)
    }

    /// Create a DiscardableFlag from a boolean value, reserved bits cleared.
    pub fn from_bool(discardable: bool) -> Self {
        DiscardableFlag(if discardable { 0x80 } else { 0x00 })
    }

    /// Check if the discardable bit is set.
    pub fn is_discardable(&self) -> bool {
        (self.0 & 0x80) != 0
    }

    /// Set or clear the discardable bit.
    pub fn set_discardable(&mut self, discardable: bool) {
        if discardable {
            self.0 |= 0x80;
        } else {
            self.0 &= 0x7F;
        }
    }

    /// Get the 7-bit reserved field value (should be 0 in well-formed packets).
    pub fn reserved(&self) -> u8 {
        self.0 & 0x7F
    }

    /// Convert to the u8 wire format representation.
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Create a DiscardableFlag from a u8 value.
    ///
    /// Bit 7 is the discardable flag, bits 6-0 are kept as received.
    pub fn from_u8(value: u8) -> Self {
        DiscardableFlag(value)
    }
}

/// Zero-copy wrapper around Option header (4 bytes).
///
/// Wire format (4 bytes):
/// ```text
/// 0               1               2               3
/// 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |           Length              |     Type      |D|  Reserved   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OptionHeader<T: AsRef<[u8]>> {
    buffer: T,
}

impl<T: AsRef<[u8]>> OptionHeader<T> {
    /// Option header wire format size in bytes.
    pub const LENGTH: usize = field::option_header::HEADER_LEN;

    /// Create an OptionHeader without validation.
    ///
    /// Accessors panic if the buffer is shorter than 4 bytes; use
    /// `new_checked` for untrusted input.
    pub fn new_unchecked(buffer: T) -> Self {
        OptionHeader { buffer }
    }

    /// Create an OptionHeader from a buffer with length validation.
    ///
    /// # Returns
    /// * `Ok(OptionHeader)` if buffer is at least 4 bytes
    /// * `Err(Error::BufferTooShort)` otherwise
    pub fn new_checked(buffer: T) -> Result<Self> {
        let header = Self::new_unchecked(buffer);
        header.check_len()?;
        Ok(header)
    }

    /// Validate that the buffer is at least 4 bytes long.
    pub fn check_len(&self) -> Result<()> {
        if self.buffer.as_ref().len() < Self::LENGTH {
            return Err(Error::BufferTooShort);
        }
        Ok(())
    }

    /// Validate the option type field contains a known option type.
    ///
    /// # Returns
    /// * `Ok(OptionType)` if option type is valid
    /// * `Err(Error::InvalidOptionType)` if option type is unknown
    pub fn check_option_type(&self) -> Result<OptionType> {
        let type_val = self.option_type();
        OptionType::from_u8(type_val).ok_or(Error::InvalidOptionType(type_val))
    }

    /// Get the Length field (2 bytes at offset 0-1, network byte order).
    ///
    /// Counts the flag/reserved byte plus the payload.
    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(&self.buffer.as_ref()[field::option_header::LENGTH])
    }

    /// Get the Type field (1 byte at offset 2).
    pub fn option_type(&self) -> u8 {
        self.buffer.as_ref()[field::option_header::TYPE.start]
    }

    /// Get the Discardable flag and reserved bits (1 byte at offset 3).
    pub fn discardable_flag(&self) -> DiscardableFlag {
        DiscardableFlag::from_u8(
            self.buffer.as_ref()[field::option_header::DISCARDABLE_FLAG_AND_RESERVED.start],
        )
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> OptionHeader<T> {
    /// Set the Length field (2 bytes at offset 0-1, network byte order).
    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buffer.as_mut()[field::option_header::LENGTH], value);
    }

    /// Set the Type field (1 byte at offset 2).
    pub fn set_option_type(&mut self, value: u8) {
        self.buffer.as_mut()[field::option_header::TYPE.start] = value;
    }

    /// Set the Discardable flag and reserved bits (1 byte at offset 3).
    pub fn set_discardable_flag(&mut self, value: DiscardableFlag) {
        self.buffer.as_mut()[field::option_header::DISCARDABLE_FLAG_AND_RESERVED.start] =
            value.as_u8();
    }
}

/// High-level representation of an option header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionHeaderRepr {
    /// Bytes following the type field (flag/reserved byte + payload)
    pub length: u16,
    /// Option kind
    pub option_type: OptionType,
    /// Discardable flag and reserved bits
    pub flag: DiscardableFlag,
}

impl OptionHeaderRepr {
    /// Consume a 4-byte option header from `reader`.
    ///
    /// # Errors
    /// * `Error::BufferTooShort` if fewer than 4 bytes remain
    /// * `Error::InvalidOptionType` if the type is unknown
    pub fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let bytes = reader.read_bytes(OptionHeader::<&[u8]>::LENGTH)?;
        let header = OptionHeader::new_checked(bytes)?;
        Ok(OptionHeaderRepr {
            length: header.length(),
            option_type: header.check_option_type()?,
            flag: header.discardable_flag(),
        })
    }

    /// Append the 4 header bytes to `sink`.
    pub fn encode<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let mut bytes = [0u8; field::option_header::HEADER_LEN];
        let mut header = OptionHeader::new_unchecked(&mut bytes[..]);
        header.set_length(self.length);
        header.set_option_type(self.option_type.as_u8());
        header.set_discardable_flag(self.flag);
        sink.put_slice(&bytes)
    }

    /// Number of payload bytes following the header (`length - 1`).
    ///
    /// `None` if the length field cannot even hold the flag/reserved byte.
    pub fn payload_len(&self) -> Option<usize> {
        (self.length as usize).checked_sub(1)
    }

    /// Total wire size of the option this header describes.
    pub fn buffer_len(&self) -> usize {
        field::option_header::UNCOUNTED_LEN + self.length as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_option_header() {
        let mut buffer = [0u8; 4];
        let mut header = OptionHeader::new_unchecked(&mut buffer[..]);

        header.set_length(8);
        header.set_option_type(OptionType::Configuration.as_u8());
        header.set_discardable_flag(DiscardableFlag::from_bool(true));

        assert_eq!(header.length(), 8);
        assert_eq!(header.option_type(), 0x01);
        assert!(header.discardable_flag().is_discardable());
        assert_eq!(buffer, [0x00, 0x08, 0x01, 0x80]);
    }

    #[test]
    fn test_option_header_type_validation() {
        let buffer = [0x00, 0x02, 0x01, 0x00];
        let header = OptionHeader::new_checked(&buffer[..]).unwrap();
        assert_eq!(header.check_option_type(), Ok(OptionType::Configuration));

        let buffer = [0x00, 0x02, 0x03, 0x00];
        let header = OptionHeader::new_checked(&buffer[..]).unwrap();
        assert_eq!(header.check_option_type(), Err(Error::InvalidOptionType(0x03)));

        assert!(OptionHeader::new_checked(&buffer[..3]).is_err());
    }

    #[test]
    fn test_option_type_roundtrip() {
        for value in 0..=u8::MAX {
            if let Some(option_type) = OptionType::from_u8(value) {
                assert_eq!(option_type.as_u8(), value);
            }
        }
        assert!(OptionType::IPv4Multicast.is_ipv4_endpoint());
        assert!(OptionType::IPv6SdEndpoint.is_ipv6_endpoint());
        assert!(!OptionType::Configuration.is_ipv4_endpoint());
    }

    #[test]
    fn test_discardable_flag() {
        let mut flag = DiscardableFlag::new();
        assert!(!flag.is_discardable());
        flag.set_discardable(true);
        assert_eq!(flag.as_u8(), 0x80);
        flag.set_discardable(false);
        assert_eq!(flag.as_u8(), 0x00);

        let flag = DiscardableFlag::from_u8(0x85);
        assert!(flag.is_discardable());
        assert_eq!(flag.reserved(), 0x05);
    }

    #[test]
    fn test_header_repr_decode_encode() {
        let data = [0x00, 0x09, 0x04, 0x80, 0xFF];
        let mut reader = Reader::new(&data);
        let header = OptionHeaderRepr::decode(&mut reader).unwrap();
        assert_eq!(header.length, 9);
        assert_eq!(header.option_type, OptionType::IPv4Endpoint);
        assert!(header.flag.is_discardable());
        assert_eq!(header.payload_len(), Some(8));
        assert_eq!(header.buffer_len(), 12);
        assert_eq!(reader.position(), 4);

        let mut out: Vec<u8> = Vec::new();
        header.encode(&mut out).unwrap();
        assert_eq!(out, &data[..4]);
    }

    #[test]
    fn test_header_repr_decode_errors() {
        let mut reader = Reader::new(&[0x00, 0x02, 0x01]);
        assert_eq!(OptionHeaderRepr::decode(&mut reader), Err(Error::BufferTooShort));

        let mut reader = Reader::new(&[0x00, 0x02, 0x77, 0x00]);
        assert_eq!(OptionHeaderRepr::decode(&mut reader), Err(Error::InvalidOptionType(0x77)));
    }
}
