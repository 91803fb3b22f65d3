///
/// Visibility of the host application as reported by its runtime.
///
/// Drives how aggressively the client polls. [`Offline`] suspends
/// polling entirely until connectivity returns.
///
/// [`Offline`]: ClientVisibility::Offline
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientVisibility {
    Foreground,
    Background,
    Offline,
}
