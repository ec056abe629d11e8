//! ISR-side byte accumulation and line framing.
//!
//! Runs in the UART receive interrupt: append the byte, detect end of line,
//! push the completed line into an spsc queue. No AT-level parsing happens
//! here; the application-side [`AtClient`](super::AtClient) drains the
//! consumer end.

use heapless::spsc::{Producer, Queue};
use heapless::String;

use crate::helpers::LossyStr;

/// Queue element and backing storage, statically allocated by the
/// application and split into the ISR/thread ends.
pub type LineQueue<const LINE: usize, const DEPTH: usize> = Queue<String<LINE>, DEPTH>;

/// Byte-to-line accumulator owned by the receive interrupt.
pub struct LineIngress<'a, const LINE: usize, const DEPTH: usize> {
    producer: Producer<'a, String<LINE>, DEPTH>,
    partial: String<LINE>,
    eol_first: u8,
    eol_second: Option<u8>,
    pending_eol: bool,
    overflowed: bool,
    dropped: u32,
}

impl<'a, const LINE: usize, const DEPTH: usize> LineIngress<'a, LINE, DEPTH> {
    pub fn new(producer: Producer<'a, String<LINE>, DEPTH>) -> Self {
        Self {
            producer,
            partial: String::new(),
            eol_first: b'\r',
            eol_second: Some(b'\n'),
            pending_eol: false,
            overflowed: false,
            dropped: 0,
        }
    }

    /// Reconfigures the end-of-line sequence (one or two characters,
    /// default `\r\n`). Some modules are switched to a single `\n` at init.
    pub fn set_eol_characters(&mut self, first: u8, second: Option<u8>) {
        self.eol_first = first;
        self.eol_second = second;
        self.pending_eol = false;
    }

    /// Lines lost to buffer overflow or a full queue since init.
    pub fn dropped_lines(&self) -> u32 {
        self.dropped
    }

    pub fn ingest_slice(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.ingest(*byte);
        }
    }

    /// Feeds one received byte. Interrupt context.
    pub fn ingest(&mut self, byte: u8) {
        if self.pending_eol {
            self.pending_eol = false;
            self.complete();
            if Some(byte) == self.eol_second {
                return;
            }
            // Lone first EOL byte still terminates; the current byte starts
            // the next line.
        }
        if byte == self.eol_first {
            match self.eol_second {
                Some(_) => self.pending_eol = true,
                None => self.complete(),
            }
            return;
        }
        if !byte.is_ascii() || byte == 0 {
            return;
        }
        if self.partial.push(byte as char).is_err() {
            self.overflowed = true;
        }
    }

    fn complete(&mut self) {
        if self.overflowed {
            self.overflowed = false;
            self.partial.clear();
            self.dropped = self.dropped.wrapping_add(1);
            warn!("AT line exceeded rx buffer, dropped");
            return;
        }
        if self.partial.is_empty() {
            return;
        }
        let line = core::mem::take(&mut self.partial);
        trace!("<-- {:?}", LossyStr(line.as_bytes()));
        if self.producer.enqueue(line).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("AT line queue full, dropped");
        }
    }
}
