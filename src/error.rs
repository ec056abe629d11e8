/// Errors reported by the protocol engine and the module drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A command or argument would not fit its fixed-capacity buffer. The
    /// affected buffer must not be reused without rebuilding it.
    Overflow,
    /// An argument was rejected while building a command, e.g. an enum index
    /// outside its string table. Nothing was transmitted.
    InvalidArgument,
    /// A response or event argument did not parse as the expected type.
    InvalidResponse,
    /// The module answered with its failure literal, *or* no confirmation
    /// arrived before the category timeout elapsed.
    ///
    /// The two cases are deliberately not distinguished here; the vendor
    /// protocol collapses them at the API boundary and callers have come to
    /// rely on that. [`AtClient::last_confirm_status`] still tells them
    /// apart for diagnostics.
    ///
    /// [`AtClient::last_confirm_status`]: crate::at::AtClient::last_confirm_status
    ConfirmFailed,
    /// The UART transmit path or a control pin reported a hardware error.
    Io,
}
