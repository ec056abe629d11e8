//! AT command text formatter.

use heapless::String;

use super::codec::{IntArg, IntFormat};
use crate::error::Error;

/// Builds one `AT...\r\n` request into a fixed-capacity buffer.
///
/// Arguments are appended with a trailing delimiter each; [`finish`] trims
/// the dangling delimiter after the last one, so optional trailing arguments
/// can simply be skipped without ever producing `...,\r\n`.
///
/// Any failure (buffer overflow, enum index out of range) poisons the
/// builder; later appends are ignored and [`finish`] reports the first
/// error. Nothing is transmitted from a poisoned builder.
///
/// ```ignore
/// let mut b = CmdBuilder::<32>::set("+CFUN");
/// b.arg_int(1u8, IntFormat::Dec);
/// let cmd = b.finish()?; // "AT+CFUN=1\r\n"
/// ```
///
/// [`finish`]: CmdBuilder::finish
pub struct CmdBuilder<const N: usize> {
    buf: String<N>,
    delimiter: char,
    wrote_arg: bool,
    failed: Option<Error>,
}

impl<const N: usize> CmdBuilder<N> {
    /// Write form: `AT<cmd>=...`.
    pub fn set(cmd: &str) -> Self {
        Self::with_suffix(cmd, "=")
    }

    /// Read form: `AT<cmd>?`.
    pub fn query(cmd: &str) -> Self {
        Self::with_suffix(cmd, "?")
    }

    /// Capability form: `AT<cmd>=?`.
    pub fn test(cmd: &str) -> Self {
        Self::with_suffix(cmd, "=?")
    }

    /// Bare form: `AT<cmd>`.
    pub fn execute(cmd: &str) -> Self {
        Self::with_suffix(cmd, "")
    }

    fn with_suffix(cmd: &str, suffix: &str) -> Self {
        let mut builder = Self {
            buf: String::new(),
            delimiter: ',',
            wrote_arg: false,
            failed: None,
        };
        let ok = builder.buf.push_str("AT").is_ok()
            && builder.buf.push_str(cmd).is_ok()
            && builder.buf.push_str(suffix).is_ok();
        if !ok {
            builder.failed = Some(Error::Overflow);
        }
        builder
    }

    /// Replaces the default `,` argument delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn arg_int<T: IntArg>(&mut self, value: T, format: IntFormat) -> &mut Self {
        if self.failed.is_none() {
            if value.write_arg(&mut self.buf, format).is_err() {
                self.failed = Some(Error::Overflow);
            }
            self.delimit();
        }
        self
    }

    pub fn arg_str(&mut self, value: &str) -> &mut Self {
        if self.failed.is_none() {
            if self.buf.push_str(value).is_err() {
                self.failed = Some(Error::Overflow);
            }
            self.delimit();
        }
        self
    }

    pub fn arg_quoted_str(&mut self, value: &str) -> &mut Self {
        if self.failed.is_none() {
            let ok = self.buf.push('"').is_ok()
                && self.buf.push_str(value).is_ok()
                && self.buf.push('"').is_ok();
            if !ok {
                self.failed = Some(Error::Overflow);
            }
            self.delimit();
        }
        self
    }

    /// Appends the string-table entry at `index`; out-of-range indices poison
    /// the builder with [`Error::InvalidArgument`].
    pub fn arg_enum(&mut self, table: &'static [&'static str], index: usize) -> &mut Self {
        if self.failed.is_none() {
            match table.get(index) {
                Some(entry) => {
                    if self.buf.push_str(entry).is_err() {
                        self.failed = Some(Error::Overflow);
                    }
                    self.delimit();
                }
                None => self.failed = Some(Error::InvalidArgument),
            }
        }
        self
    }

    /// Appends a byte array in hex text form, two chars per byte.
    pub fn arg_hex_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        use core::fmt::Write;
        if self.failed.is_none() {
            for byte in bytes {
                if write!(self.buf, "{:02X}", byte).is_err() {
                    self.failed = Some(Error::Overflow);
                    return self;
                }
            }
            self.delimit();
        }
        self
    }

    /// Appends an intentionally empty positional argument (just the
    /// delimiter), for dialects where skipped middle arguments stay in place.
    pub fn arg_empty(&mut self) -> &mut Self {
        if self.failed.is_none() {
            self.delimit();
        }
        self
    }

    fn delimit(&mut self) {
        if self.failed.is_none() {
            if self.buf.push(self.delimiter).is_err() {
                self.failed = Some(Error::Overflow);
            } else {
                self.wrote_arg = true;
            }
        }
    }

    /// Trims the dangling delimiter and terminates with CRLF.
    pub fn finish(mut self) -> Result<String<N>, Error> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        if self.wrote_arg && self.buf.ends_with(self.delimiter) {
            self.buf.pop();
        }
        self.buf.push_str("\r\n").map_err(|_| Error::Overflow)?;
        Ok(self.buf)
    }
}
