//! Field offset definitions for SOME/IP-SD option wire format structures.
//!
//! Following the smoltcp pattern, all offsets are defined as const ranges or
//! const functions so they can be evaluated at compile time.
//!
//! # Wire Format Structure
//!
//! Every option:
//! ```text
//! +----------------+----------------+----------------+----------------+
//! |          LENGTH (2 bytes)       |  TYPE (1 byte) | D | RESERVED   |
//! +----------------+----------------+----------------+----------------+
//! | PAYLOAD (LENGTH - 1 bytes)                                        |
//! +-------------------------------------------------------------------+
//! ```
//!
//! The LENGTH field counts the flag/reserved byte plus the payload, so an
//! option occupies `LENGTH + 3` bytes on the wire.

#![allow(non_snake_case)]

/// Type alias for a byte range (slice index range).
pub type Field = ::core::ops::Range<usize>;

/// Option header field offsets (4 bytes total).
///
/// All SOME/IP-SD options start with this common header.
pub mod option_header {
    use crate::field::Field;

    /// Length of the flag/reserved byte plus payload (2 bytes at offset 0-1).
    pub const LENGTH: Field = 0..2;

    /// Option type field (1 byte at offset 2).
    ///
    /// Values: 0x01=Configuration, 0x02=LoadBalancing, 0x04=IPv4Endpoint, etc.
    pub const TYPE: Field = 2..3;

    /// Discardable flag (1-bit) and reserved (7-bit) packed (1 byte at offset 3).
    pub const DISCARDABLE_FLAG_AND_RESERVED: Field = 3..4;

    /// Size of the option header in bytes.
    pub const HEADER_LEN: usize = DISCARDABLE_FLAG_AND_RESERVED.end;

    /// Bytes on the wire not counted by the LENGTH field (LENGTH + TYPE).
    pub const UNCOUNTED_LEN: usize = TYPE.end;
}

/// Configuration Option payload constants.
///
/// The payload is a sequence of length-prefixed records terminated by a
/// zero length byte:
/// ```text
/// [len][key=value][len][key][len][key=]...[0x00]
/// ```
pub mod configuration_option {
    /// LENGTH of an empty configuration option (reserved byte + terminator).
    pub const EMPTY_LENGTH: u16 = 2;

    /// Bytes an entry adds beyond its key and value (length prefix + separator).
    pub const ENTRY_OVERHEAD: usize = 2;

    /// Largest record body expressible in the one-byte length prefix.
    pub const MAX_RECORD_LEN: usize = u8::MAX as usize;

    /// Key/value separator.
    pub const SEPARATOR: u8 = b'=';

    /// Zero length prefix that ends the record sequence.
    pub const TERMINATOR: u8 = 0x00;

    /// Bytes allowed inside a record (printable US-ASCII).
    pub const PRINTABLE: ::core::ops::RangeInclusive<u8> = 0x20..=0x7E;
}

/// Load Balancing Option field offsets (4 bytes data after header).
pub mod load_balancing_option {
    use crate::field::Field;

    /// Priority field (2 bytes at offset 0-1).
    pub const PRIORITY: Field = 0..2;

    /// Weight field (2 bytes at offset 2-3).
    pub const WEIGHT: Field = 2..4;

    /// LENGTH field value of a load balancing option.
    pub const OPTION_LENGTH: u16 = 1 + WEIGHT.end as u16;
}

/// IPv4 Endpoint/Multicast/SD Endpoint Option field offsets (8 bytes data after header).
pub mod ipv4_endpoint_option {
    use crate::field::Field;

    /// IPv4 address (4 bytes at offset 0-3), followed by a reserved byte.
    pub const IPV4_ADDRESS: Field = 0..4;

    /// Transport protocol (1 byte at offset 5).
    ///
    /// Values: 0x06 = TCP, 0x11 = UDP
    pub const TRANSPORT_PROTOCOL: Field = 5..6;

    /// Port number (2 bytes at offset 6-7).
    pub const PORT: Field = 6..8;

    /// LENGTH field value of an IPv4 endpoint option.
    pub const OPTION_LENGTH: u16 = 1 + PORT.end as u16;
}

/// IPv6 Endpoint/Multicast/SD Endpoint Option field offsets (20 bytes data after header).
pub mod ipv6_endpoint_option {
    use crate::field::Field;

    /// IPv6 address (16 bytes at offset 0-15), followed by a reserved byte.
    pub const IPV6_ADDRESS: Field = 0..16;

    /// Transport protocol (1 byte at offset 17).
    ///
    /// Values: 0x06 = TCP, 0x11 = UDP
    pub const TRANSPORT_PROTOCOL: Field = 17..18;

    /// Port number (2 bytes at offset 18-19).
    pub const PORT: Field = 18..20;

    /// LENGTH field value of an IPv6 endpoint option.
    pub const OPTION_LENGTH: u16 = 1 + PORT.end as u16;
}
