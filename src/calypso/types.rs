//! Argument types for the Calypso command set.

/// Security mode of `AT+wlanConnect`, written as its string-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WlanSecurity {
    Open = 0,
    Wep = 1,
    WepShared = 2,
    WpaWpa2 = 3,
    Wpa2Plus = 4,
    Wpa3 = 5,
}

pub(crate) static SECURITY_NAMES: &[&str] =
    &["OPEN", "WEP", "WEP_SHARED", "WPA_WPA2", "WPA2_PLUS", "WPA3"];
