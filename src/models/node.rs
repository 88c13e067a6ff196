//! Graph node and time window types.

use serde::{Deserialize, Serialize};

/// Service window during which a customer expects the vehicle.
///
/// Arrivals outside the window are reported by the simulator but never
/// rejected.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either bound is NaN.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if ready.is_nan() || due.is_nan() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest allowed arrival.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowed arrival.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if `time` lies inside the window (bounds included).
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }
}

/// Role of a node in the EVRP graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Start and end of every subtour. Refills battery and inventory.
    Depot,
    /// Charging station. Refills the battery only.
    Charger,
    /// Customer with a positive demand.
    Customer,
}

impl NodeKind {
    /// Parses the single-letter type code used by instance files
    /// (`d`, `f`, `c`).
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'd' | 'D' => Some(Self::Depot),
            'f' | 'F' => Some(Self::Charger),
            'c' | 'C' => Some(Self::Customer),
            _ => None,
        }
    }

    /// Single-letter type code.
    pub fn code(&self) -> char {
        match self {
            Self::Depot => 'd',
            Self::Charger => 'f',
            Self::Customer => 'c',
        }
    }
}

/// A location in the EVRP graph: the depot, a charging station or a customer.
///
/// Nodes are identified by `index`, their position in the instance file. The
/// depot is always index 0. Two nodes compare equal when their indices match,
/// whatever their other fields hold.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::{Node, NodeKind};
///
/// let depot = Node::depot(0, 35.0, 35.0);
/// assert_eq!(depot.kind(), NodeKind::Depot);
///
/// let c = Node::customer(3, 38.0, 39.0, 10);
/// assert_eq!(c.demand(), 10);
/// assert!((depot.distance_to(&c) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    index: usize,
    x: f64,
    y: f64,
    demand: i32,
    kind: NodeKind,
    time_window: Option<TimeWindow>,
    service_time: f64,
}

impl Node {
    /// Creates a node of any kind.
    pub fn new(index: usize, kind: NodeKind, x: f64, y: f64, demand: i32) -> Self {
        Self {
            index,
            x,
            y,
            demand,
            kind,
            time_window: None,
            service_time: 0.0,
        }
    }

    /// Creates the depot (demand 0).
    pub fn depot(index: usize, x: f64, y: f64) -> Self {
        Self::new(index, NodeKind::Depot, x, y, 0)
    }

    /// Creates a charging station (demand 0).
    pub fn charger(index: usize, x: f64, y: f64) -> Self {
        Self::new(index, NodeKind::Charger, x, y, 0)
    }

    /// Creates a customer.
    pub fn customer(index: usize, x: f64, y: f64, demand: i32) -> Self {
        Self::new(index, NodeKind::Customer, x, y, demand)
    }

    /// Sets the service time window.
    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    /// Sets the time spent servicing this node.
    pub fn with_service_time(mut self, service_time: f64) -> Self {
        self.service_time = service_time;
        self
    }

    /// Position of this node in the instance (0 = depot).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Units to deliver here. Always 0 for the depot and chargers.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` for charging stations.
    ///
    /// The depot also refills the battery, but through a separate rule, so it
    /// is not a charger here.
    pub fn is_charger(&self) -> bool {
        self.kind == NodeKind::Charger
    }

    pub fn is_customer(&self) -> bool {
        self.kind == NodeKind::Customer
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    /// Euclidean distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_rejects_inverted_bounds() {
        assert!(TimeWindow::new(20.0, 10.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 10.0).is_none());
    }

    #[test]
    fn test_time_window_open_ended() {
        let tw = TimeWindow::new(0.0, f64::INFINITY).expect("valid");
        assert!(tw.contains(1e12));
    }

    #[test]
    fn test_node_kind_codes() {
        assert_eq!(NodeKind::from_code('d'), Some(NodeKind::Depot));
        assert_eq!(NodeKind::from_code('f'), Some(NodeKind::Charger));
        assert_eq!(NodeKind::from_code('c'), Some(NodeKind::Customer));
        assert_eq!(NodeKind::from_code('x'), None);
        assert_eq!(NodeKind::Charger.code(), 'f');
    }

    #[test]
    fn test_equality_by_index() {
        let a = Node::customer(4, 1.0, 2.0, 10);
        let b = Node::customer(4, 9.0, 9.0, 30);
        let c = Node::customer(5, 1.0, 2.0, 10);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_depot_is_not_a_charger() {
        assert!(!Node::depot(0, 0.0, 0.0).is_charger());
        assert!(Node::charger(1, 0.0, 0.0).is_charger());
    }

    #[test]
    fn test_builders() {
        let tw = TimeWindow::new(10.0, 50.0).expect("valid");
        let n = Node::customer(2, 0.0, 0.0, 5)
            .with_time_window(tw)
            .with_service_time(90.0);
        assert_eq!(n.time_window().map(|t| t.due()), Some(50.0));
        assert_eq!(n.service_time(), 90.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Node::depot(0, 1.0, 2.0);
        let b = Node::customer(1, 4.0, 6.0, 1);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
    }
}
