//! Unsolicited events of the Calypso module.
//!
//! Calypso groups its events by subsystem with a named sub-code after the
//! colon, all lower-case: `+eventwlan:connect,...`.

use heapless::String;

use crate::at::{ArgParser, EventEntry, IntFormat};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalypsoEvent {
    /// Module finished booting.
    Startup,
    WlanConnect,
    WlanDisconnect,
    WlanStaAdded,
    WlanStaRemoved,
    MqttOperation,
    MqttRecv,
    MqttDisconnect,
    Ipv4Acquired,
    Ipv6Acquired,
}

static WLAN_EVENTS: &[EventEntry<CalypsoEvent>] = &[
    EventEntry::leaf("connect", &[','], CalypsoEvent::WlanConnect),
    EventEntry::leaf("disconnect", &[','], CalypsoEvent::WlanDisconnect),
    EventEntry::leaf("sta_added", &[','], CalypsoEvent::WlanStaAdded),
    EventEntry::leaf("sta_removed", &[','], CalypsoEvent::WlanStaRemoved),
];

static MQTT_EVENTS: &[EventEntry<CalypsoEvent>] = &[
    EventEntry::leaf("operation", &[','], CalypsoEvent::MqttOperation),
    EventEntry::leaf("recv", &[','], CalypsoEvent::MqttRecv),
    EventEntry::leaf("disconnect", &[','], CalypsoEvent::MqttDisconnect),
];

static NETAPP_EVENTS: &[EventEntry<CalypsoEvent>] = &[
    EventEntry::leaf("ipv4_acquired", &[','], CalypsoEvent::Ipv4Acquired),
    EventEntry::leaf("ipv6_acquired", &[','], CalypsoEvent::Ipv6Acquired),
];

pub static EVENTS: &[EventEntry<CalypsoEvent>] = &[
    EventEntry::parent("+eventwlan", &[':'], WLAN_EVENTS),
    EventEntry::parent("+eventmqtt", &[':'], MQTT_EVENTS),
    EventEntry::parent("+eventnetapp", &[':'], NETAPP_EVENTS),
    EventEntry::leaf("+eventstartup", &[':'], CalypsoEvent::Startup),
];

/// Payload of `+eventwlan:connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WlanConnectEvent {
    pub ssid: String<32>,
    pub bssid: String<18>,
}

impl WlanConnectEvent {
    pub fn parse(args: &str) -> Result<Self, Error> {
        let mut parser = ArgParser::new(args);
        Ok(Self {
            ssid: parser.quoted_string()?,
            bssid: parser.quoted_string()?,
        })
    }
}

/// Payload of `+eventmqtt:recv`; the message body runs to end of line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MqttRecvEvent<'a> {
    pub topic: String<64>,
    pub qos: u8,
    pub payload: &'a str,
}

impl<'a> MqttRecvEvent<'a> {
    pub fn parse(args: &'a str) -> Result<Self, Error> {
        let mut parser = ArgParser::new(args);
        Ok(Self {
            topic: parser.quoted_string()?,
            qos: parser.int(IntFormat::Dec)?,
            payload: parser.take_rest(),
        })
    }
}
