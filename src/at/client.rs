//! Blocking request/confirmation client.
//!
//! One command is in flight at a time. The caller sends a formatted request
//! and busy-waits for the module's confirmation line with a per-category
//! deadline, while unsolicited event lines arriving in between are matched
//! against the dialect's event table and handed to the [`EventSink`].

use embassy_time::{Duration, Instant};
use embedded_io::Write;
use heapless::spsc::Consumer;
use heapless::String;

use super::event::{match_event, EventEntry};
use crate::error::Error;
use crate::helpers::LossyStr;

/// Outcome of the most recent command exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfirmStatus {
    Success,
    /// The module answered with a failure literal.
    Failed,
    /// No exchange completed: nothing sent yet, in flight, or timed out.
    Invalid,
}

/// Success/failure literals of a module dialect.
///
/// Success literals match a whole line (`OK`), failure literals match as a
/// prefix so coded variants like `+CME ERROR: 50` are caught.
pub struct ConfirmDialect {
    pub success: &'static [&'static str],
    pub failure: &'static [&'static str],
}

impl ConfirmDialect {
    pub const fn new(success: &'static [&'static str], failure: &'static [&'static str]) -> Self {
        Self { success, failure }
    }

    fn classify(&self, line: &str) -> Option<ConfirmStatus> {
        if self.success.iter().any(|s| line == *s) {
            return Some(ConfirmStatus::Success);
        }
        if self.failure.iter().any(|s| line.starts_with(s)) {
            return Some(ConfirmStatus::Failed);
        }
        None
    }
}

impl Default for ConfirmDialect {
    fn default() -> Self {
        Self::new(&["OK"], &["ERROR"])
    }
}

/// Command classes with independently configurable confirmation timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeoutCategory {
    General,
    Device,
    Socket,
    Sim,
    Sms,
    Gnss,
    Wlan,
    Mqtt,
}

impl TimeoutCategory {
    const COUNT: usize = 8;
}

/// Per-category confirmation timeouts, vendor defaults, settable at runtime.
pub struct TimeoutTable {
    ms: [u64; TimeoutCategory::COUNT],
}

impl Default for TimeoutTable {
    fn default() -> Self {
        Self {
            ms: [1_000, 5_000, 10_000, 5_000, 30_000, 10_000, 30_000, 30_000],
        }
    }
}

impl TimeoutTable {
    pub fn get(&self, category: TimeoutCategory) -> Duration {
        Duration::from_millis(self.ms[category as usize])
    }

    pub fn set(&mut self, category: TimeoutCategory, timeout_ms: u64) {
        self.ms[category as usize] = timeout_ms;
    }
}

/// Receiver for unsolicited events.
///
/// Called once per matched line, on the application thread, while the
/// client is mutably borrowed; issuing a new command from inside the sink
/// does not compile, which is exactly the single-flight contract. Keep
/// implementations quick and defer real work to the main loop.
pub trait EventSink<E> {
    fn on_event(&mut self, event: E, args: &str);
}

impl<E, F: FnMut(E, &str)> EventSink<E> for F {
    fn on_event(&mut self, event: E, args: &str) {
        self(event, args)
    }
}

/// Per-instance AT client; several module instances can coexist, each with
/// its own writer, queue and buffers.
pub struct AtClient<'a, W, E, const LINE: usize, const DEPTH: usize>
where
    W: Write,
    E: Copy + 'static,
{
    tx: W,
    rx: Consumer<'a, String<LINE>, DEPTH>,
    events: &'static [EventEntry<E>],
    dialect: ConfirmDialect,
    timeouts: TimeoutTable,
    status: ConfirmStatus,
}

impl<'a, W, E, const LINE: usize, const DEPTH: usize> AtClient<'a, W, E, LINE, DEPTH>
where
    W: Write,
    E: Copy + 'static,
{
    pub fn new(
        tx: W,
        rx: Consumer<'a, String<LINE>, DEPTH>,
        events: &'static [EventEntry<E>],
        dialect: ConfirmDialect,
    ) -> Self {
        Self {
            tx,
            rx,
            events,
            dialect,
            timeouts: TimeoutTable::default(),
            status: ConfirmStatus::Invalid,
        }
    }

    #[cfg(test)]
    pub(crate) fn tx(&self) -> &W {
        &self.tx
    }

    pub fn set_timeout(&mut self, category: TimeoutCategory, timeout_ms: u64) {
        self.timeouts.set(category, timeout_ms);
    }

    /// Outcome of the last exchange; distinguishes a module `ERROR` from a
    /// timeout where [`Error::ConfirmFailed`] does not.
    pub fn last_confirm_status(&self) -> ConfirmStatus {
        self.status
    }

    /// Returns the client to its post-init state: pending lines are
    /// dispatched or dropped and the timeout table reverts to defaults.
    pub fn reset(&mut self, sink: &mut impl EventSink<E>) {
        self.poll_events(sink);
        self.timeouts = TimeoutTable::default();
        self.status = ConfirmStatus::Invalid;
    }

    /// Transmits one formatted request (already CRLF-terminated).
    ///
    /// Stale queued lines are dispatched first so a late confirmation of a
    /// previous exchange cannot be mistaken for this one's.
    pub fn send_request(&mut self, cmd: &str, sink: &mut impl EventSink<E>) -> Result<(), Error> {
        self.poll_events(sink);
        debug!("--> {:?}", LossyStr(cmd.as_bytes()));
        self.tx.write_all(cmd.as_bytes()).map_err(|_| Error::Io)?;
        self.tx.flush().map_err(|_| Error::Io)?;
        self.status = ConfirmStatus::Invalid;
        Ok(())
    }

    /// Dispatches queued unsolicited lines outside a command exchange.
    pub fn poll_events(&mut self, sink: &mut impl EventSink<E>) {
        let table = self.events;
        while let Some(line) = self.rx.dequeue() {
            match match_event(line.as_str(), table) {
                Some((event, args)) => sink.on_event(event, args),
                None => trace!("not of interest: {:?}", LossyStr(line.as_bytes())),
            }
        }
    }

    /// Busy-waits for the confirmation of the request sent last.
    ///
    /// Returns within the category timeout plus one poll interval. Both a
    /// failure line and an expired deadline surface as
    /// [`Error::ConfirmFailed`]; see that variant for why.
    pub fn wait_for_confirm(
        &mut self,
        category: TimeoutCategory,
        sink: &mut impl EventSink<E>,
    ) -> Result<(), Error> {
        self.wait_inner(category, sink, None)
    }

    /// As [`wait_for_confirm`](Self::wait_for_confirm), additionally
    /// capturing response text lines into `response` (multiple lines joined
    /// with `\n`).
    pub fn wait_for_confirm_response<const R: usize>(
        &mut self,
        category: TimeoutCategory,
        sink: &mut impl EventSink<E>,
        response: &mut String<R>,
    ) -> Result<(), Error> {
        response.clear();
        let mut overflow = false;
        self.wait_inner(
            category,
            sink,
            Some(&mut |line: &str| {
                if !response.is_empty() && response.push('\n').is_err() {
                    overflow = true;
                    return;
                }
                if response.push_str(line).is_err() {
                    overflow = true;
                }
            }),
        )?;
        if overflow {
            return Err(Error::Overflow);
        }
        Ok(())
    }

    fn wait_inner(
        &mut self,
        category: TimeoutCategory,
        sink: &mut impl EventSink<E>,
        mut capture: Option<&mut dyn FnMut(&str)>,
    ) -> Result<(), Error> {
        let deadline = Instant::now() + self.timeouts.get(category);
        loop {
            while let Some(line) = self.rx.dequeue() {
                if let Some(status) = self.dialect.classify(line.as_str()) {
                    self.status = status;
                    return match status {
                        ConfirmStatus::Success => Ok(()),
                        _ => {
                            warn!("module reported failure: {:?}", LossyStr(line.as_bytes()));
                            Err(Error::ConfirmFailed)
                        }
                    };
                }
                if let Some((event, args)) = match_event(line.as_str(), self.events) {
                    sink.on_event(event, args);
                } else if let Some(capture) = capture.as_mut() {
                    capture(line.as_str());
                } else {
                    trace!("discarding response text: {:?}", LossyStr(line.as_bytes()));
                }
            }
            if Instant::now() >= deadline {
                self.status = ConfirmStatus::Invalid;
                warn!("confirmation timeout ({:?})", category);
                return Err(Error::ConfirmFailed);
            }
            embassy_time::block_for(Duration::from_millis(1));
        }
    }
}
