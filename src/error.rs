/// Error type for SOME/IP-SD option parsing and serialization.
///
/// Represents the option-level failures: short buffers, unknown option
/// types and inconsistent length fields. Configuration payload failures are
/// wrapped in [`Error::ConfigurationError`].
///
/// # Examples
///
/// ```
/// use someip_sd_config::error::Error;
/// use someip_sd_config::header::OptionHeaderRepr;
/// use someip_sd_config::wire::Reader;
///
/// let buffer = [0u8; 3]; // Too small for an option header
/// let result = OptionHeaderRepr::decode(&mut Reader::new(&buffer));
/// assert_eq!(result, Err(Error::BufferTooShort));
/// ```
#[derive(PartialEq, Debug, Clone, Copy, Eq)]
pub enum Error {
    /// Buffer is too short for the expected data structure.
    ///
    /// This occurs when:
    /// - A reader holds fewer bytes than an option header or fixed payload
    /// - A sink has no room left for the bytes being written
    BufferTooShort,

    /// Invalid option type value.
    ///
    /// Option type must be one of the defined option types:
    /// - 0x01: Configuration
    /// - 0x02: LoadBalancing
    /// - 0x04: IPv4Endpoint
    /// - 0x06: IPv6Endpoint
    /// - 0x14: IPv4Multicast
    /// - 0x16: IPv6Multicast
    /// - 0x24: IPv4SdEndpoint
    /// - 0x26: IPv6SdEndpoint
    InvalidOptionType(u8),

    /// Invalid transport protocol value.
    ///
    /// Transport protocol must be:
    /// - 0x06: TCP
    /// - 0x11: UDP
    InvalidProtocol(u8),

    /// A fixed-size option declared a LENGTH other than its own.
    InvalidOptionLength(u16),

    /// Length field overflow.
    ///
    /// A decoded configuration option holds more entries than a 16-bit
    /// LENGTH field can describe, so it cannot be encoded again.
    LengthOverflow,

    /// Invalid configuration option payload.
    ///
    /// This variant wraps configuration-specific errors.
    ConfigurationError(ConfigError),
}

/// Configuration-specific error types.
///
/// The decode variants are fatal: a decode that returns one of them yields
/// no option at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The option header could not be decoded, or is not a configuration
    /// option header. The payload is not examined.
    HeaderError,

    /// The LENGTH field leaves no room for the payload terminator.
    MalformedLength,

    /// Fewer bytes are available than the LENGTH field declares.
    TruncatedInput,

    /// A record's length prefix reaches past the end of the payload.
    RecordOverrun,

    /// A record starts with '='.
    EmptyKey,

    /// A record contains a byte outside printable US-ASCII (0x20-0x7E).
    InvalidCharacter,

    /// The payload ended before a zero length terminator was found.
    MissingTerminator,

    /// Bytes follow the terminator and the decode policy rejects them.
    TrailingGarbage,

    /// `1 + key.len() + value.len()` does not fit the one-byte length prefix.
    EntryTooLarge,

    /// The option LENGTH would not fit in 16 bits.
    LengthOverflow,
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::ConfigurationError(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::BufferTooShort => write!(f, "buffer too short for expected structure"),
            Error::InvalidOptionType(t) => write!(f, "invalid option type: 0x{:02x}", t),
            Error::InvalidProtocol(p) => write!(f, "invalid transport protocol: 0x{:02x}", p),
            Error::InvalidOptionLength(l) => write!(f, "invalid option length: {}", l),
            Error::LengthOverflow => write!(f, "length field overflow"),
            Error::ConfigurationError(e) => write!(f, "configuration error: {}", e),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::HeaderError => write!(f, "could not decode option header"),
            ConfigError::MalformedLength => write!(f, "invalid configuration string length"),
            ConfigError::TruncatedInput => write!(f, "configuration string truncated"),
            ConfigError::RecordOverrun => write!(f, "record exceeds configuration string"),
            ConfigError::EmptyKey => write!(f, "record starts with '='"),
            ConfigError::InvalidCharacter => write!(f, "non-printable character in record"),
            ConfigError::MissingTerminator => write!(f, "missing terminator"),
            ConfigError::TrailingGarbage => write!(f, "bytes after terminator"),
            ConfigError::EntryTooLarge => write!(f, "entry too large for one record"),
            ConfigError::LengthOverflow => write!(f, "length field overflow"),
        }
    }
}

impl core::error::Error for Error {}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", Error::BufferTooShort), "buffer too short for expected structure");
        assert_eq!(format!("{}", Error::InvalidOptionType(0xAB)), "invalid option type: 0xab");
        assert_eq!(format!("{}", Error::InvalidProtocol(0x99)), "invalid transport protocol: 0x99");
        assert_eq!(format!("{}", Error::InvalidOptionLength(7)), "invalid option length: 7");
        assert_eq!(format!("{}", Error::LengthOverflow), "length field overflow");
        assert_eq!(
            format!("{}", Error::ConfigurationError(ConfigError::EmptyKey)),
            "configuration error: record starts with '='"
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(format!("{}", ConfigError::HeaderError), "could not decode option header");
        assert_eq!(
            format!("{}", ConfigError::MalformedLength),
            "invalid configuration string length"
        );
        assert_eq!(format!("{}", ConfigError::TruncatedInput), "configuration string truncated");
        assert_eq!(
            format!("{}", ConfigError::RecordOverrun),
            "record exceeds configuration string"
        );
        assert_eq!(
            format!("{}", ConfigError::InvalidCharacter),
            "non-printable character in record"
        );
        assert_eq!(format!("{}", ConfigError::MissingTerminator), "missing terminator");
        assert_eq!(format!("{}", ConfigError::TrailingGarbage), "bytes after terminator");
        assert_eq!(format!("{}", ConfigError::EntryTooLarge), "entry too large for one record");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: Error = ConfigError::RecordOverrun.into();
        assert_eq!(err, Error::ConfigurationError(ConfigError::RecordOverrun));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(Error::BufferTooShort, Error::BufferTooShort);
        assert_ne!(Error::BufferTooShort, Error::LengthOverflow);
        assert_eq!(Error::InvalidOptionType(0x05), Error::InvalidOptionType(0x05));
        assert_ne!(Error::InvalidOptionType(0x05), Error::InvalidOptionType(0x07));
    }
}
