//! SOME/IP-SD option family.
//!
//! [`SdOption`] is a closed set of option kinds, each carrying its own
//! payload representation. Decoding reads the common header once and
//! dispatches on its type; equality is per variant, so options of different
//! kinds never compare equal.

use crate::config::{ConfigurationOption, TrailingBytesPolicy};
use crate::error::Error;
use crate::field;
use crate::header::{DiscardableFlag, OptionHeaderRepr, OptionType};
use crate::wire::{ByteSink, Reader, Result};
use byteorder::{ByteOrder, NetworkEndian};
use core::net::{Ipv4Addr, Ipv6Addr};

/// Transport protocol enumeration.
///
/// Based on IANA protocol numbers for IP protocols.
/// Used in endpoint options to specify TCP or UDP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TransportProtocol {
    /// TCP protocol (0x06)
    TCP = 0x06,
    /// UDP protocol (0x11)
    UDP = 0x11,
}

impl TransportProtocol {
    /// Convert a u8 value to a TransportProtocol.
    ///
    /// # Returns
    /// * `Some(TransportProtocol)` if value is 0x06 (TCP) or 0x11 (UDP)
    /// * `None` if value is not a supported protocol
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x06 => Some(TransportProtocol::TCP),
            0x11 => Some(TransportProtocol::UDP),
            _ => None,
        }
    }

    /// Convert the TransportProtocol to its IANA protocol number.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    fn parse(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::InvalidProtocol(value))
    }
}

/// Load Balancing Option payload.
///
/// ```text
/// |            Priority           |            Weight             |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadBalancingRepr {
    /// Priority value (lower = higher priority)
    pub priority: u16,
    /// Weight for load distribution
    pub weight: u16,
    /// Discardable flag and reserved bits from the option header
    pub flag: DiscardableFlag,
}

impl LoadBalancingRepr {
    fn parse(flag: DiscardableFlag, payload: &[u8]) -> Self {
        use field::load_balancing_option::*;
        LoadBalancingRepr {
            priority: NetworkEndian::read_u16(&payload[PRIORITY]),
            weight: NetworkEndian::read_u16(&payload[WEIGHT]),
            flag,
        }
    }

    fn emit<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.put_u16(self.priority)?;
        sink.put_u16(self.weight)
    }
}

/// IPv4 Endpoint, Multicast or SD Endpoint Option payload.
///
/// ```text
/// |                       IPv4 Address                            |
/// |    Reserved   |   Protocol    |             Port              |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4EndpointRepr {
    /// One of `IPv4Endpoint`, `IPv4Multicast` or `IPv4SdEndpoint`
    pub kind: OptionType,
    /// Endpoint address
    pub address: Ipv4Addr,
    /// Transport protocol
    pub protocol: TransportProtocol,
    /// Port number
    pub port: u16,
    /// Discardable flag and reserved bits from the option header
    pub flag: DiscardableFlag,
}

impl Ipv4EndpointRepr {
    fn parse(header: &OptionHeaderRepr, payload: &[u8]) -> Result<Self> {
        use field::ipv4_endpoint_option::*;
        let mut address = [0u8; 4];
        address.copy_from_slice(&payload[IPV4_ADDRESS]);
        Ok(Ipv4EndpointRepr {
            kind: header.option_type,
            address: Ipv4Addr::from(address),
            protocol: TransportProtocol::parse(payload[TRANSPORT_PROTOCOL.start])?,
            port: NetworkEndian::read_u16(&payload[PORT]),
            flag: header.flag,
        })
    }

    fn emit<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.put_slice(&self.address.octets())?;
        // Reserved
        sink.put_u8(0)?;
        sink.put_u8(self.protocol.as_u8())?;
        sink.put_u16(self.port)
    }
}

/// IPv6 Endpoint, Multicast or SD Endpoint Option payload.
///
/// ```text
/// |                  IPv6 Address (16 bytes)                      |
/// |    Reserved   |   Protocol    |             Port              |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6EndpointRepr {
    /// One of `IPv6Endpoint`, `IPv6Multicast` or `IPv6SdEndpoint`
    pub kind: OptionType,
    /// Endpoint address
    pub address: Ipv6Addr,
    /// Transport protocol
    pub protocol: TransportProtocol,
    /// Port number
    pub port: u16,
    /// Discardable flag and reserved bits from the option header
    pub flag: DiscardableFlag,
}

impl Ipv6EndpointRepr {
    fn parse(header: &OptionHeaderRepr, payload: &[u8]) -> Result<Self> {
        use field::ipv6_endpoint_option::*;
        let mut address = [0u8; 16];
        address.copy_from_slice(&payload[IPV6_ADDRESS]);
        Ok(Ipv6EndpointRepr {
            kind: header.option_type,
            address: Ipv6Addr::from(address),
            protocol: TransportProtocol::parse(payload[TRANSPORT_PROTOCOL.start])?,
            port: NetworkEndian::read_u16(&payload[PORT]),
            flag: header.flag,
        })
    }

    fn emit<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.put_slice(&self.address.octets())?;
        // Reserved
        sink.put_u8(0)?;
        sink.put_u8(self.protocol.as_u8())?;
        sink.put_u16(self.port)
    }
}

/// A SOME/IP-SD option of any supported kind.
///
/// # Example
/// ```
/// use someip_sd_config::config::ConfigurationOption;
/// use someip_sd_config::header::DiscardableFlag;
/// use someip_sd_config::options::{LoadBalancingRepr, SdOption};
/// use someip_sd_config::wire::Reader;
///
/// let mut config = ConfigurationOption::new();
/// config.add("instance", "primary").unwrap();
/// let options = [
///     SdOption::Configuration(config),
///     SdOption::LoadBalancing(LoadBalancingRepr {
///         priority: 1,
///         weight: 10,
///         flag: DiscardableFlag::new(),
///     }),
/// ];
///
/// let mut buf: Vec<u8> = Vec::new();
/// for option in &options {
///     option.encode(&mut buf).unwrap();
/// }
///
/// let mut reader = Reader::new(&buf);
/// assert_eq!(SdOption::decode(&mut reader).unwrap(), options[0]);
/// assert_eq!(SdOption::decode(&mut reader).unwrap(), options[1]);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdOption {
    /// Configuration option (0x01)
    Configuration(ConfigurationOption),
    /// Load balancing option (0x02)
    LoadBalancing(LoadBalancingRepr),
    /// IPv4 endpoint, multicast or SD endpoint option (0x04, 0x14, 0x24)
    Ipv4Endpoint(Ipv4EndpointRepr),
    /// IPv6 endpoint, multicast or SD endpoint option (0x06, 0x16, 0x26)
    Ipv6Endpoint(Ipv6EndpointRepr),
}

impl SdOption {
    /// Option type written in the header.
    pub fn option_type(&self) -> OptionType {
        match self {
            SdOption::Configuration(_) => OptionType::Configuration,
            SdOption::LoadBalancing(_) => OptionType::LoadBalancing,
            SdOption::Ipv4Endpoint(repr) => repr.kind,
            SdOption::Ipv6Endpoint(repr) => repr.kind,
        }
    }

    /// Option header describing this option.
    ///
    /// # Errors
    /// `Error::LengthOverflow` for a configuration option too large to encode.
    pub fn header(&self) -> Result<OptionHeaderRepr> {
        let (length, flag) = match self {
            SdOption::Configuration(config) => return config.header(),
            SdOption::LoadBalancing(repr) => {
                (field::load_balancing_option::OPTION_LENGTH, repr.flag)
            }
            SdOption::Ipv4Endpoint(repr) => (field::ipv4_endpoint_option::OPTION_LENGTH, repr.flag),
            SdOption::Ipv6Endpoint(repr) => (field::ipv6_endpoint_option::OPTION_LENGTH, repr.flag),
        };
        Ok(OptionHeaderRepr {
            length,
            option_type: self.option_type(),
            flag,
        })
    }

    /// Total encoded size including the 4-byte option header.
    pub fn buffer_len(&self) -> usize {
        let length = match self {
            SdOption::Configuration(config) => return config.buffer_len(),
            SdOption::LoadBalancing(_) => field::load_balancing_option::OPTION_LENGTH,
            SdOption::Ipv4Endpoint(_) => field::ipv4_endpoint_option::OPTION_LENGTH,
            SdOption::Ipv6Endpoint(_) => field::ipv6_endpoint_option::OPTION_LENGTH,
        };
        field::option_header::UNCOUNTED_LEN + length as usize
    }

    /// Append the encoded option to `sink`.
    ///
    /// # Errors
    /// * `Error::InvalidOptionType` if an endpoint's `kind` belongs to a
    ///   different address family or option kind
    /// * `Error::LengthOverflow` for a configuration option too large to encode
    /// * `Error::BufferTooShort` if the sink is full
    pub fn encode<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match self {
            SdOption::Configuration(config) => config.encode(sink),
            SdOption::LoadBalancing(repr) => {
                self.header()?.encode(sink)?;
                repr.emit(sink)
            }
            SdOption::Ipv4Endpoint(repr) => {
                if !repr.kind.is_ipv4_endpoint() {
                    return Err(Error::InvalidOptionType(repr.kind.as_u8()));
                }
                self.header()?.encode(sink)?;
                repr.emit(sink)
            }
            SdOption::Ipv6Endpoint(repr) => {
                if !repr.kind.is_ipv6_endpoint() {
                    return Err(Error::InvalidOptionType(repr.kind.as_u8()));
                }
                self.header()?.encode(sink)?;
                repr.emit(sink)
            }
        }
    }

    /// Decode one option from `reader`, tolerating bytes after a
    /// configuration payload terminator.
    pub fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Self::decode_with(reader, TrailingBytesPolicy::default())
    }

    /// Decode one option from `reader`.
    ///
    /// # Errors
    /// * `Error::BufferTooShort` for a short header or fixed payload
    /// * `Error::InvalidOptionType` for an unknown type
    /// * `Error::InvalidOptionLength` if a fixed-size option declares another
    ///   length
    /// * `Error::InvalidProtocol` for an endpoint with an unknown protocol
    /// * `Error::ConfigurationError` for a malformed configuration payload
    pub fn decode_with(reader: &mut Reader<'_>, policy: TrailingBytesPolicy) -> Result<Self> {
        let header = OptionHeaderRepr::decode(reader)?;
        match header.option_type {
            OptionType::Configuration => Ok(SdOption::Configuration(
                ConfigurationOption::decode_payload(&header, reader, policy)?,
            )),
            OptionType::LoadBalancing => {
                let expected = field::load_balancing_option::OPTION_LENGTH;
                let payload = fixed_payload(&header, reader, expected)?;
                Ok(SdOption::LoadBalancing(LoadBalancingRepr::parse(header.flag, payload)))
            }
            OptionType::IPv4Endpoint | OptionType::IPv4Multicast | OptionType::IPv4SdEndpoint => {
                let expected = field::ipv4_endpoint_option::OPTION_LENGTH;
                let payload = fixed_payload(&header, reader, expected)?;
                Ok(SdOption::Ipv4Endpoint(Ipv4EndpointRepr::parse(&header, payload)?))
            }
            OptionType::IPv6Endpoint | OptionType::IPv6Multicast | OptionType::IPv6SdEndpoint => {
                let expected = field::ipv6_endpoint_option::OPTION_LENGTH;
                let payload = fixed_payload(&header, reader, expected)?;
                Ok(SdOption::Ipv6Endpoint(Ipv6EndpointRepr::parse(&header, payload)?))
            }
        }
    }
}

fn fixed_payload<'a>(
    header: &OptionHeaderRepr,
    reader: &mut Reader<'a>,
    expected: u16,
) -> Result<&'a [u8]> {
    if header.length != expected {
        return Err(Error::InvalidOptionLength(header.length));
    }
    reader.read_bytes(expected as usize - 1)
}

impl From<ConfigurationOption> for SdOption {
    fn from(config: ConfigurationOption) -> Self {
        SdOption::Configuration(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use alloc::vec::Vec;

    fn roundtrip(option: &SdOption) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();
        option.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), option.buffer_len());
        let decoded = SdOption::decode(&mut Reader::new(&buf)).unwrap();
        assert_eq!(&decoded, option);
        buf
    }

    #[test]
    fn test_load_balancing_option() {
        let option = SdOption::LoadBalancing(LoadBalancingRepr {
            priority: 100,
            weight: 50,
            flag: DiscardableFlag::new(),
        });
        let buf = roundtrip(&option);
        assert_eq!(buf, [0x00, 0x05, 0x02, 0x00, 0x00, 0x64, 0x00, 0x32]);
    }

    #[test]
    fn test_ipv4_endpoint_option() {
        let option = SdOption::Ipv4Endpoint(Ipv4EndpointRepr {
            kind: OptionType::IPv4Endpoint,
            address: Ipv4Addr::new(192, 168, 1, 1),
            protocol: TransportProtocol::UDP,
            port: 30490,
            flag: DiscardableFlag::new(),
        });
        let buf = roundtrip(&option);
        assert_eq!(buf, [0x00, 0x09, 0x04, 0x00, 192, 168, 1, 1, 0x00, 0x11, 0x77, 0x1A]);
    }

    #[test]
    fn test_ipv6_multicast_option() {
        let option = SdOption::Ipv6Endpoint(Ipv6EndpointRepr {
            kind: OptionType::IPv6Multicast,
            address: Ipv6Addr::new(0xff14, 0, 0, 0, 0, 0, 0, 1),
            protocol: TransportProtocol::UDP,
            port: 30490,
            flag: DiscardableFlag::new(),
        });
        let buf = roundtrip(&option);
        assert_eq!(buf.len(), 24);
        assert_eq!(buf[2], 0x16);
    }

    #[test]
    fn test_fixed_options_keep_discardable_flag() {
        let bytes = [0x00, 0x05, 0x02, 0x80, 0x00, 0x01, 0x00, 0x02];
        let option = SdOption::decode(&mut Reader::new(&bytes)).unwrap();
        match &option {
            SdOption::LoadBalancing(repr) => assert!(repr.flag.is_discardable()),
            other => panic!("unexpected option {:?}", other),
        }
        assert_eq!(roundtrip(&option), bytes);

        let bytes = [0x00, 0x09, 0x14, 0x81, 239, 0, 0, 1, 0x00, 0x11, 0x77, 0x1A];
        let option = SdOption::decode(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(option.header().unwrap().flag, DiscardableFlag::from_u8(0x81));
        assert_eq!(roundtrip(&option), bytes);

        let mut bytes = [0u8; 24];
        bytes[..4].copy_from_slice(&[0x00, 0x15, 0x26, 0x80]);
        bytes[21] = 0x06;
        let option = SdOption::decode(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(roundtrip(&option), bytes);
    }

    #[test]
    fn test_oversized_configuration_fails_to_encode() {
        let mut payload: Vec<u8> = Vec::new();
        for i in 0..16383u32 {
            payload.push(3);
            payload.extend_from_slice(&[b'a' + (i / 676) as u8, b'a' + (i / 26 % 26) as u8]);
            payload.push(b'a' + (i % 26) as u8);
        }
        payload.push(0x00);
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&[0xFF, 0xFE, 0x01, 0x00]);
        bytes.extend_from_slice(&payload);

        let option = SdOption::decode(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(option.header(), Err(Error::LengthOverflow));
        assert_eq!(option.buffer_len(), 3 + 2 + 16383 * 5);
        let mut buf: Vec<u8> = Vec::new();
        assert_eq!(option.encode(&mut buf), Err(Error::LengthOverflow));
    }

    #[test]
    fn test_configuration_dispatch() {
        let config = ConfigurationOption::try_from_iter([("a", "1")]).unwrap();
        roundtrip(&SdOption::from(config));
    }

    #[test]
    fn test_configuration_errors_are_wrapped() {
        let bytes = [0x00, 0x03, 0x01, 0x00, 0x01, b'='];
        assert_eq!(
            SdOption::decode(&mut Reader::new(&bytes)),
            Err(Error::ConfigurationError(ConfigError::EmptyKey))
        );
    }

    #[test]
    fn test_trailing_policy_passed_through() {
        let bytes = [0x00, 0x03, 0x01, 0x00, 0x00, 0xEE];
        assert!(SdOption::decode(&mut Reader::new(&bytes)).is_ok());
        assert_eq!(
            SdOption::decode_with(&mut Reader::new(&bytes), TrailingBytesPolicy::Reject),
            Err(Error::ConfigurationError(ConfigError::TrailingGarbage))
        );
    }

    #[test]
    fn test_fixed_option_length_checked() {
        let bytes = [0x00, 0x06, 0x02, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00];
        assert_eq!(
            SdOption::decode(&mut Reader::new(&bytes)),
            Err(Error::InvalidOptionLength(6))
        );

        let bytes = [0x00, 0x05, 0x02, 0x00, 0x00, 0x01];
        assert_eq!(SdOption::decode(&mut Reader::new(&bytes)), Err(Error::BufferTooShort));
    }

    #[test]
    fn test_endpoint_protocol_validation() {
        let bytes = [0x00, 0x09, 0x24, 0x00, 10, 0, 0, 1, 0x00, 0x01, 0x77, 0x1A];
        assert_eq!(
            SdOption::decode(&mut Reader::new(&bytes)),
            Err(Error::InvalidProtocol(0x01))
        );
    }

    #[test]
    fn test_endpoint_kind_checked_on_encode() {
        let option = SdOption::Ipv4Endpoint(Ipv4EndpointRepr {
            kind: OptionType::IPv6Endpoint,
            address: Ipv4Addr::LOCALHOST,
            protocol: TransportProtocol::TCP,
            port: 1,
            flag: DiscardableFlag::new(),
        });
        let mut buf: Vec<u8> = Vec::new();
        assert_eq!(option.encode(&mut buf), Err(Error::InvalidOptionType(0x06)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_equality_is_per_variant() {
        let empty = SdOption::Configuration(ConfigurationOption::new());
        let lb = SdOption::LoadBalancing(LoadBalancingRepr {
            priority: 0,
            weight: 0,
            flag: DiscardableFlag::new(),
        });
        assert_ne!(empty, lb);
        assert_eq!(empty, SdOption::Configuration(ConfigurationOption::default()));
    }

    #[test]
    fn test_transport_protocol() {
        assert_eq!(TransportProtocol::from_u8(0x06), Some(TransportProtocol::TCP));
        assert_eq!(TransportProtocol::from_u8(0x11), Some(TransportProtocol::UDP));
        assert_eq!(TransportProtocol::from_u8(0x3A), None);
        assert_eq!(TransportProtocol::UDP.as_u8(), 0x11);
    }
}
