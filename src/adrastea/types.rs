//! Argument types for the Adrastea command set.

use crate::error::Error;

/// `AT+CFUN` phone functionality levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhoneFunctionality {
    Minimum = 0,
    Full = 1,
    DisableRf = 4,
}

/// Optional second `AT+CFUN` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetType {
    DontReset = 0,
    Reset = 1,
}

/// `+CEREG` network registration states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStatus {
    NotRegistered = 0,
    RegisteredHome = 1,
    Searching = 2,
    Denied = 3,
    Unknown = 4,
    RegisteredRoaming = 5,
}

impl TryFrom<u8> for RegistrationStatus {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        Ok(match value {
            0 => Self::NotRegistered,
            1 => Self::RegisteredHome,
            2 => Self::Searching,
            3 => Self::Denied,
            4 => Self::Unknown,
            5 => Self::RegisteredRoaming,
            _ => return Err(Error::InvalidResponse),
        })
    }
}
