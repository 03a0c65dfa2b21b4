/// Requests delivered to the GUI thread from background services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Settle on the given item, or a random one.
    Spin(Option<usize>),
    ConfigReload,
}
