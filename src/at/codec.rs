//! Typed argument codec for AT command and event text.
//!
//! Both directions share the same conventions: arguments are delimited by a
//! single configurable character (`,` unless a dialect says otherwise), the
//! final argument is terminated by end of line, and every read consumes its
//! token *and* the following delimiter so a comma-separated list can be
//! parsed by chained calls.

use heapless::String;

use crate::error::Error;

/// Integer notation on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntFormat {
    Dec,
    /// Hex without prefix, as the modules echo it. Parsing accepts either
    /// case and an optional `0x`.
    Hex,
}

/// Integer types that can be written to and parsed from AT argument text.
///
/// Covers the 8/16/32-bit signed and unsigned widths the modules use.
pub trait IntArg: Sized + Copy {
    fn write_arg<W: core::fmt::Write>(self, w: &mut W, format: IntFormat) -> core::fmt::Result;
    fn parse_arg(s: &str, format: IntFormat) -> Option<Self>;
}

macro_rules! impl_int_arg {
    ($($ty:ty => $uty:ty),* $(,)?) => {
        $(
            impl IntArg for $ty {
                fn write_arg<W: core::fmt::Write>(
                    self,
                    w: &mut W,
                    format: IntFormat,
                ) -> core::fmt::Result {
                    match format {
                        IntFormat::Dec => write!(w, "{}", self),
                        IntFormat::Hex => write!(w, "{:X}", self),
                    }
                }

                fn parse_arg(s: &str, format: IntFormat) -> Option<Self> {
                    match format {
                        IntFormat::Dec => s.parse().ok(),
                        IntFormat::Hex => {
                            let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
                            // `{:X}` emits the two's-complement bit pattern
                            // for negative values, so parse through the
                            // unsigned width and reinterpret.
                            <$uty>::from_str_radix(s, 16).ok().map(|bits| bits as $ty)
                        }
                    }
                }
            }
        )*
    };
}

impl_int_arg!(u8 => u8, i8 => u8, u16 => u16, i16 => u16, u32 => u32, i32 => u32);

/// Cursor over the argument text of a received line.
///
/// Typically fed with the remainder returned by
/// [`match_event`](crate::at::match_event).
pub struct ArgParser<'a> {
    rest: &'a str,
    delimiter: char,
    done: bool,
}

impl<'a> ArgParser<'a> {
    pub fn new(args: &'a str) -> Self {
        Self::with_delimiter(args, ',')
    }

    pub fn with_delimiter(args: &'a str, delimiter: char) -> Self {
        Self {
            rest: args,
            delimiter,
            done: false,
        }
    }

    /// Unconsumed input, delimiters included.
    pub fn remainder(&self) -> &'a str {
        self.rest
    }

    pub fn is_exhausted(&self) -> bool {
        self.done || self.rest.is_empty()
    }

    fn next_token(&mut self) -> Result<&'a str, Error> {
        if self.done {
            return Err(Error::InvalidResponse);
        }
        match self.rest.find(self.delimiter) {
            Some(at) => {
                let token = &self.rest[..at];
                self.rest = &self.rest[at + self.delimiter.len_utf8()..];
                Ok(token)
            }
            None => {
                // End of line terminates the final argument.
                self.done = true;
                let token = self.rest;
                self.rest = "";
                Ok(token)
            }
        }
    }

    pub fn int<T: IntArg>(&mut self, format: IntFormat) -> Result<T, Error> {
        let token = self.next_token()?.trim();
        T::parse_arg(token, format).ok_or(Error::InvalidResponse)
    }

    /// Reads an unquoted string argument verbatim.
    pub fn string<const N: usize>(&mut self) -> Result<String<N>, Error> {
        let token = self.next_token()?;
        String::try_from(token).map_err(|_| Error::Overflow)
    }

    /// Reads a `"..."` argument, stripping the surrounding quotes. The
    /// delimiter character is allowed inside the quotes.
    pub fn quoted_string<const N: usize>(&mut self) -> Result<String<N>, Error> {
        if self.done {
            return Err(Error::InvalidResponse);
        }
        let inner = self
            .rest
            .trim_start_matches(' ')
            .strip_prefix('"')
            .ok_or(Error::InvalidResponse)?;
        let end = inner.find('"').ok_or(Error::InvalidResponse)?;
        let token = &inner[..end];
        let mut after = &inner[end + 1..];
        match after.strip_prefix(self.delimiter) {
            Some(stripped) => after = stripped,
            None if after.is_empty() => self.done = true,
            None => return Err(Error::InvalidResponse),
        }
        self.rest = after;
        String::try_from(token).map_err(|_| Error::Overflow)
    }

    /// Looks the next token up in a static string table, returning its index.
    pub fn enumeration(&mut self, table: &[&str]) -> Result<usize, Error> {
        let token = self.next_token()?.trim();
        table
            .iter()
            .position(|entry| *entry == token)
            .ok_or(Error::InvalidResponse)
    }

    /// Decodes a hex-text argument (two chars per byte) into `out`, returning
    /// the number of bytes written.
    pub fn hex_bytes(&mut self, out: &mut [u8]) -> Result<usize, Error> {
        let token = self.next_token()?.trim();
        if token.len() % 2 != 0 {
            return Err(Error::InvalidResponse);
        }
        let len = token.len() / 2;
        if len > out.len() {
            return Err(Error::Overflow);
        }
        for (i, pair) in token.as_bytes().chunks_exact(2).enumerate() {
            let hi = hex_val(pair[0]).ok_or(Error::InvalidResponse)?;
            let lo = hex_val(pair[1]).ok_or(Error::InvalidResponse)?;
            out[i] = hi << 4 | lo;
        }
        Ok(len)
    }

    /// Consumes everything up to end of line as one raw argument.
    pub fn take_rest(&mut self) -> &'a str {
        self.done = true;
        core::mem::take(&mut self.rest)
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
