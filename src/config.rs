use embedded_hal::digital::OutputPin;

/// Board-level configuration for a module driver.
///
/// Implemented by the application for its concrete pin types. All pins are
/// optional; a driver without a reset line simply leaves the defaults in
/// place and `hard_reset` becomes a no-op.
pub trait ModuleConfig {
    type ResetPin: OutputPin;
    type WakeUpPin: OutputPin;

    /// Time from releasing reset until the module accepts commands.
    const BOOT_TIME_MS: u64 = 2_000;
    /// Low pulse width applied to the reset line.
    const RESET_PULSE_MS: u64 = 10;
    /// High pulse width applied to the wake-up line.
    const WAKE_PULSE_MS: u64 = 10;

    fn reset_pin(&mut self) -> Option<&mut Self::ResetPin> {
        None
    }

    fn wake_up_pin(&mut self) -> Option<&mut Self::WakeUpPin> {
        None
    }
}

/// Placeholder pin type for configurations without a given control line.
pub struct NoPin;

impl embedded_hal::digital::ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
