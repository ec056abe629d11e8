//! Unsolicited events of the Adrastea module.

use heapless::String;

use super::types::RegistrationStatus;
use crate::at::{ArgParser, EventEntry, IntFormat};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdrasteaEvent {
    /// `%SOCKETEV:1` — data waiting on a socket.
    SocketDataReceived,
    /// `%SOCKETEV:2` — socket deactivated by the idle timer.
    SocketDeactivatedIdleTimer,
    /// `%SOCKETEV:3` — connection terminated by the peer.
    SocketTerminatedByPeer,
    /// `%SOCKETEV:4` — incoming connection accepted on a listener.
    SocketAccepted,
    /// `%SOCKETEV:5` — TLS handshake failed on a secure socket.
    SocketSslHandshakeFailed,
    /// `+CEREG` — EPS network registration changed.
    NetworkRegistration,
    /// `+CGEV` — packet domain event.
    PacketDomain,
    /// `+CMTI` — SMS delivered to storage.
    SmsReceived,
    /// `%IGNSSEVU:FIX` — GNSS position fix available.
    GnssFix,
    /// `%IGNSSEVU:NMEA` — GNSS NMEA sentence.
    GnssNmea,
}

static SOCKET_EVENTS: &[EventEntry<AdrasteaEvent>] = &[
    EventEntry::leaf("1", &[','], AdrasteaEvent::SocketDataReceived),
    EventEntry::leaf("2", &[','], AdrasteaEvent::SocketDeactivatedIdleTimer),
    EventEntry::leaf("3", &[','], AdrasteaEvent::SocketTerminatedByPeer),
    EventEntry::leaf("4", &[','], AdrasteaEvent::SocketAccepted),
    EventEntry::leaf("5", &[','], AdrasteaEvent::SocketSslHandshakeFailed),
];

static GNSS_EVENTS: &[EventEntry<AdrasteaEvent>] = &[
    EventEntry::leaf("FIX", &[','], AdrasteaEvent::GnssFix),
    EventEntry::leaf("NMEA", &[','], AdrasteaEvent::GnssNmea),
];

/// Top-level event table; `%SOCKETEV` and `%IGNSSEVU` fan out into numeric
/// respectively named sub-codes.
pub static EVENTS: &[EventEntry<AdrasteaEvent>] = &[
    EventEntry::parent("%SOCKETEV", &[':'], SOCKET_EVENTS),
    EventEntry::parent("%IGNSSEVU", &[':'], GNSS_EVENTS),
    EventEntry::leaf("+CEREG", &[':'], AdrasteaEvent::NetworkRegistration),
    EventEntry::leaf("+CGEV", &[':'], AdrasteaEvent::PacketDomain),
    EventEntry::leaf("+CMTI", &[':'], AdrasteaEvent::SmsReceived),
];

/// Payload of the socket sub-events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketEvent {
    pub socket_id: u8,
}

impl SocketEvent {
    pub fn parse(args: &str) -> Result<Self, Error> {
        let mut parser = ArgParser::new(args);
        Ok(Self {
            socket_id: parser.int(IntFormat::Dec)?,
        })
    }
}

/// Payload of `+CEREG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkRegistrationEvent {
    pub status: RegistrationStatus,
}

impl NetworkRegistrationEvent {
    pub fn parse(args: &str) -> Result<Self, Error> {
        let mut parser = ArgParser::new(args);
        let status: u8 = parser.int(IntFormat::Dec)?;
        Ok(Self {
            status: status.try_into()?,
        })
    }
}

/// Payload of `+CMTI`, e.g. `"ME",3`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmsIndication {
    pub storage: String<8>,
    pub index: u16,
}

impl SmsIndication {
    pub fn parse(args: &str) -> Result<Self, Error> {
        let mut parser = ArgParser::new(args);
        Ok(Self {
            storage: parser.quoted_string()?,
            index: parser.int(IntFormat::Dec)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at::match_event;

    #[test]
    fn socket_data_received_scenario() {
        let (event, args) = match_event("%SOCKETEV:1,7", EVENTS).unwrap();
        assert_eq!(event, AdrasteaEvent::SocketDataReceived);
        assert_eq!(args, "7");
        assert_eq!(SocketEvent::parse(args), Ok(SocketEvent { socket_id: 7 }));
    }

    #[test]
    fn socket_sub_codes() {
        assert_eq!(
            match_event("%SOCKETEV:2", EVENTS),
            Some((AdrasteaEvent::SocketDeactivatedIdleTimer, ""))
        );
        assert_eq!(
            match_event("%SOCKETEV:5,0", EVENTS),
            Some((AdrasteaEvent::SocketSslHandshakeFailed, "0"))
        );
        assert_eq!(match_event("%SOCKETEV:9,1", EVENTS), None);
    }

    #[test]
    fn registration_event() {
        let (event, args) = match_event("+CEREG: 5", EVENTS).unwrap();
        assert_eq!(event, AdrasteaEvent::NetworkRegistration);
        assert_eq!(
            NetworkRegistrationEvent::parse(args),
            Ok(NetworkRegistrationEvent {
                status: RegistrationStatus::RegisteredRoaming
            })
        );
        assert_eq!(
            NetworkRegistrationEvent::parse("9"),
            Err(Error::InvalidResponse)
        );
    }

    #[test]
    fn sms_indication() {
        let (event, args) = match_event("+CMTI: \"ME\",3", EVENTS).unwrap();
        assert_eq!(event, AdrasteaEvent::SmsReceived);
        let sms = SmsIndication::parse(args).unwrap();
        assert_eq!(sms.storage.as_str(), "ME");
        assert_eq!(sms.index, 3);
    }

    #[test]
    fn gnss_events() {
        assert_eq!(
            match_event("%IGNSSEVU:FIX,2023", EVENTS),
            Some((AdrasteaEvent::GnssFix, "2023"))
        );
    }

    #[test]
    fn unknown_lines_are_not_of_interest() {
        assert_eq!(match_event("%BATTEV:1", EVENTS), None);
        assert_eq!(match_event("random text", EVENTS), None);
    }
}
