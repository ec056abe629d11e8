//! Driver for the Adrastea cellular module.
//!
//! Thin typed wrappers over the [`at`](crate::at) engine: each operation
//! formats one command, transmits it and waits for the module's
//! confirmation, forwarding any unsolicited events to the caller's sink.

pub mod types;
pub mod urc;

use embassy_time::Duration;
use embedded_hal::digital::OutputPin;
use embedded_io::Write;
use heapless::spsc::Consumer;
use heapless::String;

use crate::at::{AtClient, CmdBuilder, ConfirmDialect, EventSink, IntFormat, TimeoutCategory};
use crate::config::ModuleConfig;
use crate::error::Error;

pub use types::{PhoneFunctionality, RegistrationStatus, ResetType};
pub use urc::AdrasteaEvent;

const CMD_LEN: usize = 128;

/// Confirmation literals of the Adrastea AT interface.
pub const CONFIRM: ConfirmDialect =
    ConfirmDialect::new(&["OK"], &["ERROR", "+CME ERROR", "+CMS ERROR"]);

pub struct AdrasteaClient<'a, W, const LINE: usize, const DEPTH: usize>
where
    W: Write,
{
    at: AtClient<'a, W, AdrasteaEvent, LINE, DEPTH>,
}

impl<'a, W, const LINE: usize, const DEPTH: usize> AdrasteaClient<'a, W, LINE, DEPTH>
where
    W: Write,
{
    pub fn new(tx: W, rx: Consumer<'a, String<LINE>, DEPTH>) -> Self {
        Self {
            at: AtClient::new(tx, rx, urc::EVENTS, CONFIRM),
        }
    }

    /// Direct access to the engine, for commands without a wrapper here.
    pub fn at_client(&mut self) -> &mut AtClient<'a, W, AdrasteaEvent, LINE, DEPTH> {
        &mut self.at
    }

    /// Dispatches queued unsolicited lines; call from the main loop.
    pub fn poll_events(&mut self, sink: &mut impl EventSink<AdrasteaEvent>) {
        self.at.poll_events(sink);
    }

    /// Releases the module: pending lines are flushed and runtime timeout
    /// overrides revert to defaults.
    pub fn deinit(&mut self, sink: &mut impl EventSink<AdrasteaEvent>) {
        self.at.reset(sink);
    }

    /// Pulses the reset line (when the board wired one up) and waits out the
    /// boot time, discarding the boot banner.
    pub fn hard_reset<C: ModuleConfig>(
        &mut self,
        config: &mut C,
        sink: &mut impl EventSink<AdrasteaEvent>,
    ) -> Result<(), Error> {
        let Some(pin) = config.reset_pin() else {
            debug!("no reset pin configured, skipping hard reset");
            return Ok(());
        };
        pin.set_low().map_err(|_| Error::Io)?;
        embassy_time::block_for(Duration::from_millis(C::RESET_PULSE_MS));
        pin.set_high().map_err(|_| Error::Io)?;
        embassy_time::block_for(Duration::from_millis(C::BOOT_TIME_MS));
        self.at.poll_events(sink);
        Ok(())
    }

    /// Pulses the wake-up line (when the board wired one up) to bring the
    /// module out of sleep. A no-op without the pin; follow up with
    /// [`attention`](Self::attention) to verify the module is responsive.
    pub fn wake_up<C: ModuleConfig>(&mut self, config: &mut C) -> Result<(), Error> {
        let Some(pin) = config.wake_up_pin() else {
            debug!("no wake-up pin configured, skipping wake pulse");
            return Ok(());
        };
        pin.set_high().map_err(|_| Error::Io)?;
        embassy_time::block_for(Duration::from_millis(C::WAKE_PULSE_MS));
        pin.set_low().map_err(|_| Error::Io)?;
        Ok(())
    }

    /// `AT` — liveness probe.
    pub fn attention(&mut self, sink: &mut impl EventSink<AdrasteaEvent>) -> Result<(), Error> {
        let cmd = CmdBuilder::<CMD_LEN>::execute("").finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at.wait_for_confirm(TimeoutCategory::General, sink)
    }

    /// `AT+CGMI` — manufacturer identity, captured from the response text.
    pub fn get_manufacturer_identity<const R: usize>(
        &mut self,
        sink: &mut impl EventSink<AdrasteaEvent>,
        out: &mut String<R>,
    ) -> Result<(), Error> {
        let cmd = CmdBuilder::<CMD_LEN>::execute("+CGMI").finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at
            .wait_for_confirm_response(TimeoutCategory::Device, sink, out)
    }

    /// `AT+CFUN=<fun>[,<rst>]` — set phone functionality. The reset type is
    /// optional and omitted entirely when `None`.
    pub fn set_phone_functionality(
        &mut self,
        fun: PhoneFunctionality,
        reset: Option<ResetType>,
        sink: &mut impl EventSink<AdrasteaEvent>,
    ) -> Result<(), Error> {
        let mut builder = CmdBuilder::<CMD_LEN>::set("+CFUN");
        builder.arg_int(fun as u8, IntFormat::Dec);
        if let Some(reset) = reset {
            builder.arg_int(reset as u8, IntFormat::Dec);
        }
        let cmd = builder.finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at.wait_for_confirm(TimeoutCategory::Device, sink)
    }

    /// `AT%SOCKETDATA="RECEIVE",<id>,<len>` — fetch pending socket data,
    /// usually in response to [`AdrasteaEvent::SocketDataReceived`].
    pub fn receive_socket_data<const R: usize>(
        &mut self,
        socket_id: u8,
        max_length: u16,
        sink: &mut impl EventSink<AdrasteaEvent>,
        out: &mut String<R>,
    ) -> Result<(), Error> {
        let mut builder = CmdBuilder::<CMD_LEN>::set("%SOCKETDATA");
        builder
            .arg_quoted_str("RECEIVE")
            .arg_int(socket_id, IntFormat::Dec)
            .arg_int(max_length, IntFormat::Dec);
        let cmd = builder.finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at
            .wait_for_confirm_response(TimeoutCategory::Socket, sink, out)
    }

    /// `AT+CMGR=<index>` — read the SMS a `+CMTI` indication pointed at.
    pub fn read_sms<const R: usize>(
        &mut self,
        index: u16,
        sink: &mut impl EventSink<AdrasteaEvent>,
        out: &mut String<R>,
    ) -> Result<(), Error> {
        let mut builder = CmdBuilder::<CMD_LEN>::set("+CMGR");
        builder.arg_int(index, IntFormat::Dec);
        let cmd = builder.finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at
            .wait_for_confirm_response(TimeoutCategory::Sms, sink, out)
    }

    /// `AT%IGNSSACT=<0|1>` — GNSS receiver on/off.
    pub fn gnss_active(
        &mut self,
        active: bool,
        sink: &mut impl EventSink<AdrasteaEvent>,
    ) -> Result<(), Error> {
        let mut builder = CmdBuilder::<CMD_LEN>::set("%IGNSSACT");
        builder.arg_int(active as u8, IntFormat::Dec);
        let cmd = builder.finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at.wait_for_confirm(TimeoutCategory::Gnss, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::spsc::{Producer, Queue};

    type TestQueue = Queue<String<64>, 8>;

    /// UART mock that feeds scripted module replies back through the line
    /// queue when the request is flushed.
    struct ScriptedTx<'a> {
        sent: std::vec::Vec<u8>,
        replies: std::collections::VecDeque<&'static str>,
        producer: Producer<'a, String<64>, 8>,
    }

    impl<'a> embedded_io::ErrorType for ScriptedTx<'a> {
        type Error = core::convert::Infallible;
    }

    impl<'a> embedded_io::Write for ScriptedTx<'a> {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.sent.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            while let Some(line) = self.replies.pop_front() {
                self.producer.enqueue(String::try_from(line).unwrap()).unwrap();
            }
            Ok(())
        }
    }

    fn client_with<'a>(
        queue: &'a mut TestQueue,
        replies: &[&'static str],
    ) -> AdrasteaClient<'a, ScriptedTx<'a>, 64, 8> {
        let (producer, consumer) = queue.split();
        let tx = ScriptedTx {
            sent: std::vec::Vec::new(),
            replies: replies.iter().copied().collect(),
            producer,
        };
        AdrasteaClient::new(tx, consumer)
    }

    /// Control pin that records every level it is driven to.
    #[derive(Default)]
    struct RecordingPin {
        levels: std::vec::Vec<bool>,
    }

    impl embedded_hal::digital::ErrorType for RecordingPin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for RecordingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.push(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestBoard {
        reset: RecordingPin,
        wake: RecordingPin,
    }

    impl ModuleConfig for TestBoard {
        type ResetPin = RecordingPin;
        type WakeUpPin = RecordingPin;

        const BOOT_TIME_MS: u64 = 1;
        const RESET_PULSE_MS: u64 = 1;
        const WAKE_PULSE_MS: u64 = 1;

        fn reset_pin(&mut self) -> Option<&mut RecordingPin> {
            Some(&mut self.reset)
        }

        fn wake_up_pin(&mut self) -> Option<&mut RecordingPin> {
            Some(&mut self.wake)
        }
    }

    #[test]
    fn hard_reset_pulses_the_reset_line_low() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &[]);
        let mut board = TestBoard::default();
        let mut sink = |_: AdrasteaEvent, _: &str| {};

        client.hard_reset(&mut board, &mut sink).unwrap();
        assert_eq!(board.reset.levels, [false, true]);
        assert!(board.wake.levels.is_empty());
    }

    #[test]
    fn wake_up_pulses_the_wake_line_high() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &[]);
        let mut board = TestBoard::default();

        client.wake_up(&mut board).unwrap();
        assert_eq!(board.wake.levels, [true, false]);
        assert!(board.reset.levels.is_empty());
    }

    #[test]
    fn cfun_without_reset_type_has_no_dangling_delimiter() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["OK"]);
        let mut sink = |_: AdrasteaEvent, _: &str| {};

        client
            .set_phone_functionality(PhoneFunctionality::Full, None, &mut sink)
            .unwrap();
        assert_eq!(
            client.at.last_confirm_status(),
            crate::at::ConfirmStatus::Success
        );
        assert_eq!(client.at.tx().sent, b"AT+CFUN=1\r\n");
    }

    #[test]
    fn cfun_with_reset_type() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["OK"]);
        let mut sink = |_: AdrasteaEvent, _: &str| {};

        client
            .set_phone_functionality(PhoneFunctionality::Full, Some(ResetType::Reset), &mut sink)
            .unwrap();
        assert_eq!(client.at.tx().sent, b"AT+CFUN=1,1\r\n");
    }

    #[test]
    fn manufacturer_identity_is_captured() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["Some Vendor", "OK"]);
        let mut sink = |_: AdrasteaEvent, _: &str| {};

        let mut out: String<64> = String::new();
        client.get_manufacturer_identity(&mut sink, &mut out).unwrap();
        assert_eq!(client.at.tx().sent, b"AT+CGMI\r\n");
        assert_eq!(out.as_str(), "Some Vendor");
    }

    #[test]
    fn socket_data_receive_round() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["%SOCKETDATA:1,4,0,\"61626364\"", "OK"]);
        let mut sink = |_: AdrasteaEvent, _: &str| {};

        let mut out: String<64> = String::new();
        client.receive_socket_data(1, 1500, &mut sink, &mut out).unwrap();
        assert_eq!(client.at.tx().sent, b"AT%SOCKETDATA=\"RECEIVE\",1,1500\r\n");
        assert_eq!(out.as_str(), "%SOCKETDATA:1,4,0,\"61626364\"");
    }

    #[test]
    fn event_during_exchange_reaches_the_sink() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["%SOCKETEV:1,2", "OK"]);
        let mut seen = std::vec::Vec::new();
        let mut sink =
            |event: AdrasteaEvent, args: &str| seen.push((event, std::string::String::from(args)));

        client.attention(&mut sink).unwrap();
        assert_eq!(seen, [(AdrasteaEvent::SocketDataReceived, "2".into())]);
    }

    #[test]
    fn cme_error_fails_like_plain_error() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["+CME ERROR: 50"]);
        let mut sink = |_: AdrasteaEvent, _: &str| {};

        assert_eq!(client.attention(&mut sink), Err(Error::ConfirmFailed));
        assert_eq!(
            client.at.last_confirm_status(),
            crate::at::ConfirmStatus::Failed
        );
    }
}
