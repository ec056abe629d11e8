//! Driver for the Calypso Wi-Fi module.
//!
//! Same engine, different dialect: Calypso confirms with `OK` but reports
//! failures as lower-case coded `error:<cmd>,<code>` lines, takes string
//! arguments quoted, and leaves skipped middle arguments empty.

pub mod types;
pub mod urc;

use embedded_io::Write;
use heapless::spsc::Consumer;
use heapless::String;

use crate::at::{AtClient, CmdBuilder, ConfirmDialect, EventSink, IntFormat, TimeoutCategory};
use crate::error::Error;

pub use types::WlanSecurity;
pub use urc::CalypsoEvent;

const CMD_LEN: usize = 192;

/// Confirmation literals of the Calypso AT interface.
pub const CONFIRM: ConfirmDialect = ConfirmDialect::new(&["OK"], &["error"]);

pub struct CalypsoClient<'a, W, const LINE: usize, const DEPTH: usize>
where
    W: Write,
{
    at: AtClient<'a, W, CalypsoEvent, LINE, DEPTH>,
}

impl<'a, W, const LINE: usize, const DEPTH: usize> CalypsoClient<'a, W, LINE, DEPTH>
where
    W: Write,
{
    pub fn new(tx: W, rx: Consumer<'a, String<LINE>, DEPTH>) -> Self {
        Self {
            at: AtClient::new(tx, rx, urc::EVENTS, CONFIRM),
        }
    }

    pub fn at_client(&mut self) -> &mut AtClient<'a, W, CalypsoEvent, LINE, DEPTH> {
        &mut self.at
    }

    pub fn poll_events(&mut self, sink: &mut impl EventSink<CalypsoEvent>) {
        self.at.poll_events(sink);
    }

    /// `AT+wlanConnect=<ssid>,<bssid>,<security>,<key>` — join an access
    /// point. The BSSID slot stays empty (any AP of that SSID) and the key
    /// is omitted for open networks.
    pub fn wlan_connect(
        &mut self,
        ssid: &str,
        security: WlanSecurity,
        key: Option<&str>,
        sink: &mut impl EventSink<CalypsoEvent>,
    ) -> Result<(), Error> {
        let mut builder = CmdBuilder::<CMD_LEN>::set("+wlanConnect");
        builder
            .arg_quoted_str(ssid)
            .arg_empty()
            .arg_enum(types::SECURITY_NAMES, security as usize);
        if let Some(key) = key {
            builder.arg_quoted_str(key);
        }
        let cmd = builder.finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at.wait_for_confirm(TimeoutCategory::Wlan, sink)
    }

    /// `AT+wlanDisconnect` — leave the current network.
    pub fn wlan_disconnect(
        &mut self,
        sink: &mut impl EventSink<CalypsoEvent>,
    ) -> Result<(), Error> {
        let cmd = CmdBuilder::<CMD_LEN>::execute("+wlanDisconnect").finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at.wait_for_confirm(TimeoutCategory::Wlan, sink)
    }

    /// `AT+sleep[=<timeout>]` — power down, optionally with a wake timeout
    /// in seconds.
    pub fn sleep(
        &mut self,
        timeout_s: Option<u32>,
        sink: &mut impl EventSink<CalypsoEvent>,
    ) -> Result<(), Error> {
        let cmd = match timeout_s {
            Some(timeout) => {
                let mut builder = CmdBuilder::<CMD_LEN>::set("+sleep");
                builder.arg_int(timeout, IntFormat::Dec);
                builder.finish()?
            }
            None => CmdBuilder::<CMD_LEN>::execute("+sleep").finish()?,
        };
        self.at.send_request(&cmd, sink)?;
        self.at.wait_for_confirm(TimeoutCategory::Device, sink)
    }

    /// `AT+stop` — orderly shutdown of the network processor.
    pub fn stop(&mut self, sink: &mut impl EventSink<CalypsoEvent>) -> Result<(), Error> {
        let cmd = CmdBuilder::<CMD_LEN>::execute("+stop").finish()?;
        self.at.send_request(&cmd, sink)?;
        self.at.wait_for_confirm(TimeoutCategory::Device, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::spsc::{Producer, Queue};

    type TestQueue = Queue<String<64>, 8>;

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
    ) -> CalypsoClient<'a, ScriptedTx<'a>, 64, 8> {
        let (producer, consumer) = queue.split();
        let tx = ScriptedTx {
            sent: std::vec::Vec::new(),
            replies: replies.iter().copied().collect(),
            producer,
        };
        CalypsoClient::new(tx, consumer)
    }

    #[test]
    fn wlan_connect_with_key() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["OK"]);
        let mut sink = |_: CalypsoEvent, _: &str| {};

        client
            .wlan_connect("MyWifi", WlanSecurity::WpaWpa2, Some("secret"), &mut sink)
            .unwrap();
        assert_eq!(
            client.at.tx().sent,
            b"AT+wlanConnect=\"MyWifi\",,WPA_WPA2,\"secret\"\r\n"
        );
    }

    #[test]
    fn wlan_connect_open_omits_key_cleanly() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["OK"]);
        let mut sink = |_: CalypsoEvent, _: &str| {};

        client
            .wlan_connect("Cafe", WlanSecurity::Open, None, &mut sink)
            .unwrap();
        assert_eq!(
            client.at.tx().sent,
            b"AT+wlanConnect=\"Cafe\",,OPEN\r\n"
        );
    }

    #[test]
    fn coded_error_line_fails() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["error:wlanConnect,-2005"]);
        let mut sink = |_: CalypsoEvent, _: &str| {};

        assert_eq!(
            client.wlan_connect("x", WlanSecurity::Open, None, &mut sink),
            Err(Error::ConfirmFailed)
        );
    }

    #[test]
    fn sleep_with_timeout() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["OK"]);
        let mut sink = |_: CalypsoEvent, _: &str| {};

        client.sleep(Some(120), &mut sink).unwrap();
        assert_eq!(client.at.tx().sent, b"AT+sleep=120\r\n");
    }

    #[test]
    fn sleep_without_timeout_uses_bare_form() {
        let mut queue = TestQueue::new();
        let mut client = client_with(&mut queue, &["OK"]);
        let mut sink = |_: CalypsoEvent, _: &str| {};

        client.sleep(None, &mut sink).unwrap();
        assert_eq!(client.at.tx().sent, b"AT+sleep\r\n");
    }
}
