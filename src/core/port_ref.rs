/// The port a signal arrived on, seen from the receiving node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRef {
  /// Inbound port with the given index; carries upstream-to-downstream
  /// signals.
  Inlet(usize),
  /// Outbound port with the given index; carries downstream-to-upstream
  /// signals.
  Outlet(usize),
  /// No port: the signal targets the node itself (`Start`, `Event`).
  Node,
}
