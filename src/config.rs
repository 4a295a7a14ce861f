use crate::error::{ConfigError, Error};
use crate::field::configuration_option::{
    EMPTY_LENGTH, ENTRY_OVERHEAD, MAX_RECORD_LEN, PRINTABLE, SEPARATOR, TERMINATOR,
};
use crate::field::option_header::UNCOUNTED_LEN;
use crate::header::{DiscardableFlag, OptionHeaderRepr, OptionType};
use crate::wire::{ByteSink, Reader};
use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::string::String;
use log::{debug, warn};

/// A single validated record borrowed from a configuration payload.
///
/// Records follow the DNS-SD TXT record format:
/// - Key only: `"enabled"` (value is empty)
/// - Key with empty value: `"name="`
/// - Key with value: `"version=1.0"`
///
/// Only the first '=' separates; later ones belong to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    key: &'a str,
    value: &'a str,
}

impl<'a> Record<'a> {
    /// Validate and split a record body (without its length prefix).
    ///
    /// # Errors
    /// * `ConfigError::EmptyKey` if the record starts with '='
    /// * `ConfigError::InvalidCharacter` if any byte is outside 0x20-0x7E
    /// * `ConfigError::RecordOverrun` if `bytes` is empty (a zero length
    ///   prefix is the terminator, not a record)
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ConfigError> {
        match bytes.first() {
            None => return Err(ConfigError::RecordOverrun),
            Some(&SEPARATOR) => return Err(ConfigError::EmptyKey),
            Some(_) => {}
        }

        let mut separator = None;
        for (i, byte) in bytes.iter().enumerate() {
            if !PRINTABLE.contains(byte) {
                return Err(ConfigError::InvalidCharacter);
            }
            if *byte == SEPARATOR && separator.is_none() {
                separator = Some(i);
            }
        }

        // Printable ASCII is always valid UTF-8
        let text = core::str::from_utf8(bytes).map_err(|_| ConfigError::InvalidCharacter)?;
        Ok(match separator {
            Some(pos) => Record {
                key: &text[..pos],
                value: &text[pos + 1..],
            },
            None => Record { key: text, value: "" },
        })
    }

    /// Get the record key.
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Get the record value (empty for key-only records).
    pub fn value(&self) -> &'a str {
        self.value
    }
}

/// Iterator over the records of a configuration payload.
///
/// Walks `[len][record][len][record]...[0x00]`, checking every length prefix
/// against the end of the payload. Yields `None` once the terminator is
/// reached; after the first error it yields nothing more.
///
/// # Example
/// ```
/// use someip_sd_config::config::Records;
///
/// let payload = b"\x07enabled\x0bversion=1.0\x00";
/// let mut records = Records::new(payload);
/// let first = records.next().unwrap().unwrap();
/// assert_eq!((first.key(), first.value()), ("enabled", ""));
/// let second = records.next().unwrap().unwrap();
/// assert_eq!((second.key(), second.value()), ("version", "1.0"));
/// assert!(records.next().is_none());
/// assert!(records.trailing().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Records<'a> {
    payload: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Records<'a> {
    /// Create an iterator over a payload starting at its first length prefix.
    pub fn new(payload: &'a [u8]) -> Self {
        Records {
            payload,
            pos: 0,
            done: false,
        }
    }

    /// Bytes following the terminator.
    ///
    /// Only meaningful once the iterator returned `None`; before that it is
    /// whatever has not been walked yet.
    pub fn trailing(&self) -> &'a [u8] {
        let start = if self.done { self.pos + 1 } else { self.pos };
        self.payload.get(start..).unwrap_or(&[])
    }

    fn fail(&mut self, err: ConfigError) -> Option<Result<Record<'a>, ConfigError>> {
        self.done = true;
        // Nothing after a failure is a trailing byte
        self.pos = self.payload.len();
        Some(Err(err))
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>, ConfigError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(&length) = self.payload.get(self.pos) else {
            return self.fail(ConfigError::MissingTerminator);
        };

        if length == TERMINATOR {
            self.done = true;
            return None;
        }

        let start = self.pos + 1;
        let end = start + length as usize;
        if end > self.payload.len() {
            return self.fail(ConfigError::RecordOverrun);
        }

        match Record::parse(&self.payload[start..end]) {
            Ok(record) => {
                self.pos = end;
                Some(Ok(record))
            }
            Err(err) => self.fail(err),
        }
    }
}

/// What to do with bytes found between the terminator and the end of the
/// declared payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingBytesPolicy {
    /// Log a warning and keep the decoded entries.
    #[default]
    Warn,
    /// Fail the decode with `ConfigError::TrailingGarbage`.
    Reject,
}

/// Configuration Option: a sorted set of ASCII key/value pairs.
///
/// The option LENGTH field is maintained on every mutation, so
/// [`length`](Self::length) is always
/// `2 + Σ (key.len() + value.len() + 2)` without re-encoding.
///
/// Entries are encoded in ascending key order; two options are equal when
/// they hold the same entries, however they were built.
///
/// # Example
/// ```
/// use someip_sd_config::config::ConfigurationOption;
/// use someip_sd_config::wire::Reader;
///
/// let mut option = ConfigurationOption::new();
/// option.add("version", "1.0").unwrap();
/// option.add("enabled", "").unwrap();
/// assert_eq!(option.length(), 2 + (7 + 3 + 2) + (7 + 0 + 2));
///
/// let mut buf: Vec<u8> = Vec::new();
/// option.encode(&mut buf).unwrap();
/// assert_eq!(buf.len(), option.buffer_len());
///
/// let decoded = ConfigurationOption::decode(&mut Reader::new(&buf)).unwrap();
/// assert_eq!(decoded, option);
/// assert_eq!(decoded.get("version"), "1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ConfigurationOption {
    entries: BTreeMap<String, String>,
    // Wider than the wire field: a decoded option may re-encode longer
    length: u32,
    flag: DiscardableFlag,
}

impl Default for ConfigurationOption {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_cost(key: &str, value: &str) -> usize {
    key.len() + value.len() + ENTRY_OVERHEAD
}

impl ConfigurationOption {
    /// Create an empty option (`length() == 2`).
    pub fn new() -> Self {
        ConfigurationOption {
            entries: BTreeMap::new(),
            length: u32::from(EMPTY_LENGTH),
            flag: DiscardableFlag::new(),
        }
    }

    /// Build an option from key/value pairs, later pairs replacing earlier ones.
    ///
    /// # Errors
    /// Fails on the first pair `add` rejects.
    pub fn try_from_iter<I, K, V>(iter: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut option = Self::new();
        for (key, value) in iter {
            option.add(key, value)?;
        }
        Ok(option)
    }

    /// Insert or replace the value for `key`.
    ///
    /// Keys and values are not checked for printable ASCII; this is the
    /// locally trusted path. A key containing '=' or control bytes will not
    /// survive a round trip.
    ///
    /// # Errors
    /// * `ConfigError::EntryTooLarge` if `1 + key.len() + value.len() > 255`
    /// * `ConfigError::LengthOverflow` if the option LENGTH would exceed u16
    ///
    /// On error the option is left unchanged.
    pub fn add(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let key = key.into();
        let value = value.into();

        if 1 + key.len() + value.len() > MAX_RECORD_LEN {
            return Err(ConfigError::EntryTooLarge);
        }

        let released = self
            .entries
            .get(&key)
            .map_or(0, |old| entry_cost(&key, old));
        let length = (self.length as usize - released) + entry_cost(&key, &value);
        if length > u16::MAX as usize {
            return Err(ConfigError::LengthOverflow);
        }

        self.entries.insert(key, value);
        self.length = length as u32;
        Ok(())
    }

    /// Remove `key` if present.
    ///
    /// # Returns
    /// The removed value, `None` if the key was absent.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let value = self.entries.remove(key)?;
        // Cannot underflow: the entry's cost was added when it was inserted
        self.length -= entry_cost(key, &value) as u32;
        Some(value)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Values in the same order as [`keys`](Self::keys).
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Key/value pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value for `key`, or the empty string if absent.
    pub fn get(&self, key: &str) -> &str {
        self.entries.get(key).map_or("", String::as_str)
    }

    /// Whether `key` is present (distinguishes an empty value from absence).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the option has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Option LENGTH field: reserved byte + encoded records + terminator.
    ///
    /// Options built with [`add`](Self::add) always fit the 16-bit wire field.
    /// A decoded option can exceed it: key-only records gain a '=' when
    /// re-encoded. Such an option fails to [`encode`](Self::encode).
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Discardable flag and reserved bits carried in the header.
    pub fn flag(&self) -> DiscardableFlag {
        self.flag
    }

    /// Set the discardable flag byte written by `encode`.
    pub fn set_flag(&mut self, flag: DiscardableFlag) {
        self.flag = flag;
    }

    /// Option header describing this option.
    ///
    /// # Errors
    /// `Error::LengthOverflow` if [`length`](Self::length) exceeds u16.
    pub fn header(&self) -> Result<OptionHeaderRepr, Error> {
        Ok(OptionHeaderRepr {
            length: u16::try_from(self.length).map_err(|_| Error::LengthOverflow)?,
            option_type: OptionType::Configuration,
            flag: self.flag,
        })
    }

    /// Encoded size of the records plus terminator (`length() - 1`).
    pub fn payload_len(&self) -> usize {
        self.length as usize - 1
    }

    /// Total encoded size including the 4-byte option header.
    pub fn buffer_len(&self) -> usize {
        UNCOUNTED_LEN + self.length as usize
    }

    /// Append the option header and payload to `sink`.
    ///
    /// Each entry becomes `[1 + key.len() + value.len()] key '=' value`, in
    /// ascending key order, followed by a `0x00` terminator.
    ///
    /// # Errors
    /// * `Error::LengthOverflow` if the option was decoded with more entries
    ///   than one option can carry; nothing is written
    /// * `Error::BufferTooShort` for a full `SliceSink`
    pub fn encode<S: ByteSink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        self.header()?.encode(sink)?;
        for (key, value) in &self.entries {
            // Bounded by MAX_RECORD_LEN in `add`
            sink.put_u8((1 + key.len() + value.len()) as u8)?;
            sink.put_slice(key.as_bytes())?;
            sink.put_u8(SEPARATOR)?;
            sink.put_slice(value.as_bytes())?;
        }
        sink.put_u8(TERMINATOR)
    }

    /// Decode a configuration option (header and payload) from `reader`,
    /// tolerating bytes after the terminator with a warning.
    ///
    /// # Errors
    /// See [`decode_with`](Self::decode_with).
    pub fn decode(reader: &mut Reader<'_>) -> Result<Self, ConfigError> {
        Self::decode_with(reader, TrailingBytesPolicy::default())
    }

    /// Decode a configuration option (header and payload) from `reader`.
    ///
    /// # Errors
    /// * `ConfigError::HeaderError` if the header is short, unknown or not a
    ///   configuration header
    /// * any error of [`decode_payload`](Self::decode_payload)
    pub fn decode_with(
        reader: &mut Reader<'_>,
        policy: TrailingBytesPolicy,
    ) -> Result<Self, ConfigError> {
        let header = match OptionHeaderRepr::decode(reader) {
            Ok(header) => header,
            Err(err) => {
                warn!("Configuration Option: could not decode option header: {}", err);
                return Err(ConfigError::HeaderError);
            }
        };
        if header.option_type != OptionType::Configuration {
            warn!(
                "Configuration Option: unexpected option type 0x{:02x}",
                header.option_type.as_u8()
            );
            return Err(ConfigError::HeaderError);
        }
        Self::decode_payload(&header, reader, policy)
    }

    /// Decode the payload following an already decoded header.
    ///
    /// Consumes exactly `header.length - 1` bytes from `reader`. Keys seen
    /// more than once keep their first value. The returned option's length
    /// is recomputed from the entries kept and may exceed u16 (see
    /// [`length`](Self::length)); that is logged, not rejected.
    ///
    /// # Errors
    /// * `ConfigError::MalformedLength` if `header.length < 2`
    /// * `ConfigError::TruncatedInput` if `reader` holds fewer bytes
    /// * `ConfigError::RecordOverrun`, `EmptyKey`, `InvalidCharacter` or
    ///   `MissingTerminator` for a malformed record sequence
    /// * `ConfigError::TrailingGarbage` if bytes follow the terminator and
    ///   `policy` is `Reject`
    pub fn decode_payload(
        header: &OptionHeaderRepr,
        reader: &mut Reader<'_>,
        policy: TrailingBytesPolicy,
    ) -> Result<Self, ConfigError> {
        let payload_len = match header.payload_len() {
            Some(len) if len > 0 => len,
            _ => {
                warn!("Configuration Option: invalid string length {}", header.length);
                return Err(ConfigError::MalformedLength);
            }
        };

        let payload = reader.read_bytes(payload_len).map_err(|_| {
            warn!(
                "Configuration Option: string of {} bytes truncated to {}",
                payload_len,
                reader.remaining()
            );
            ConfigError::TruncatedInput
        })?;

        let mut option = ConfigurationOption {
            flag: header.flag,
            ..Self::new()
        };
        let mut length = u32::from(EMPTY_LENGTH);
        let mut records = Records::new(payload);
        for record in &mut records {
            let record = record.inspect_err(|err| {
                warn!("Configuration Option: invalid record: {}", err);
            })?;
            match option.entries.entry(record.key().to_owned()) {
                Entry::Vacant(slot) => {
                    // Record length is a u8, so the cost fits
                    length += entry_cost(record.key(), record.value()) as u32;
                    slot.insert(record.value().to_owned());
                }
                Entry::Occupied(_) => {
                    debug!("Configuration Option: ignoring duplicate key {:?}", record.key());
                }
            }
        }

        let trailing = records.trailing().len();
        if trailing > 0 {
            match policy {
                TrailingBytesPolicy::Warn => {
                    warn!("Configuration Option: {} bytes after terminator", trailing);
                }
                TrailingBytesPolicy::Reject => {
                    warn!("Configuration Option: rejecting {} bytes after terminator", trailing);
                    return Err(ConfigError::TrailingGarbage);
                }
            }
        }

        if length > u32::from(u16::MAX) {
            warn!(
                "Configuration Option: {} entries need LENGTH {}, cannot be re-encoded",
                option.len(),
                length
            );
        }
        option.length = length;
        Ok(option)
    }
}

impl PartialEq for ConfigurationOption {
    fn eq(&self, other: &Self) -> bool {
        // The type is fixed and the flag is not part of the value
        self.entries == other.entries
    }
}

impl Eq for ConfigurationOption {}
