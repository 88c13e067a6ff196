//! Loading EVRP benchmark instances.
//!
//! Instances use the E-VRPTW text layout: one row per node (depot `d`,
//! charging station `f`, customer `c`) followed by the vehicle parameters
//! written as `<key> <description> /<value>/`. See [`parser`] for the exact
//! line grammar.

mod parser;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use crate::models::{Node, NodeKind, ProblemDefinition, ProblemError, TimeWindow, VehicleParameters};

use parser::{classify, Line, NodeRow};

/// Errors raised while reading an instance.
#[derive(Debug, Error)]
pub enum InstanceError {
    /// The instance file could not be read.
    #[error("failed to read instance {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A node row used a type code other than `d`, `f` or `c`.
    #[error("line {line}: unknown node type {code:?}")]
    UnknownNodeType { line: usize, code: String },
    /// A node row did not match `id type x y demand [ready due service]`.
    #[error("line {line}: malformed node row {content:?}")]
    MalformedNode { line: usize, content: String },
    /// A node row declared a time window that closes before it opens.
    #[error("line {line}: time window [{ready}, {due}] is empty")]
    InvalidTimeWindow { line: usize, ready: f64, due: f64 },
    /// A parameter row was not of the form `key description /value/`.
    #[error("line {line}: malformed parameter row {content:?}")]
    MalformedParameter { line: usize, content: String },
    /// A parameter value was not a number.
    #[error("line {line}: parameter {key} has non-numeric value {value:?}")]
    InvalidParameter {
        line: usize,
        key: char,
        value: String,
    },
    /// A required vehicle parameter never appeared.
    #[error("missing vehicle parameter {key} ({description})")]
    MissingParameter { key: char, description: &'static str },
    /// The nodes do not form a valid problem.
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

/// A parsed instance: its name and the problem it defines.
#[derive(Debug, Clone)]
pub struct Instance {
    /// File name the instance was loaded from, or the caller-supplied name.
    pub name: String,
    pub problem: ProblemDefinition,
}

#[derive(Debug, Default)]
struct Parameters {
    battery_capacity: Option<f64>,
    load_capacity: Option<f64>,
    consumption_rate: Option<f64>,
    inverse_recharging_rate: Option<f64>,
    average_velocity: Option<f64>,
}

impl Parameters {
    fn set(&mut self, key: char, value: f64) {
        let slot = match key {
            'Q' => &mut self.battery_capacity,
            'C' => &mut self.load_capacity,
            'r' => &mut self.consumption_rate,
            'g' => &mut self.inverse_recharging_rate,
            'v' => &mut self.average_velocity,
            _ => {
                debug!(key = %key, "ignoring unknown vehicle parameter");
                return;
            }
        };
        *slot = Some(value);
    }

    fn into_vehicle(self) -> Result<VehicleParameters, InstanceError> {
        let battery = self.battery_capacity.ok_or(InstanceError::MissingParameter {
            key: 'Q',
            description: "vehicle fuel tank capacity",
        })?;
        let load = self.load_capacity.ok_or(InstanceError::MissingParameter {
            key: 'C',
            description: "vehicle load capacity",
        })?;
        let rate = self.consumption_rate.ok_or(InstanceError::MissingParameter {
            key: 'r',
            description: "fuel consumption rate",
        })?;

        Ok(VehicleParameters::new(load as i32, battery, rate)
            .with_inverse_recharging_rate(self.inverse_recharging_rate.unwrap_or(0.0))
            .with_average_velocity(self.average_velocity.unwrap_or(1.0)))
    }
}

fn build_node(index: usize, line: usize, row: &NodeRow<'_>) -> Result<Node, InstanceError> {
    let mut chars = row.code.chars();
    let kind = match (chars.next().and_then(NodeKind::from_code), chars.next()) {
        (Some(kind), None) => kind,
        _ => {
            return Err(InstanceError::UnknownNodeType {
                line,
                code: row.code.to_string(),
            })
        }
    };

    // Demand is written as a decimal but always integral in practice.
    let demand = if kind == NodeKind::Customer {
        row.demand as i32
    } else {
        0
    };
    let mut node = Node::new(index, kind, row.x, row.y, demand);

    if let Some((ready, due, service)) = row.schedule {
        let tw = TimeWindow::new(ready, due)
            .ok_or(InstanceError::InvalidTimeWindow { line, ready, due })?;
        node = node.with_time_window(tw).with_service_time(service);
    }
    Ok(node)
}

/// Parses instance text. `name` labels the instance in results and logs.
///
/// # Examples
///
/// ```
/// use evrp_routing::instance;
///
/// let text = "\
/// StringID Type x y demand ReadyTime DueDate ServiceTime
/// D0 d 0.0 0.0 0.0 0.0 1000.0 0.0
/// S0 f 0.0 0.0 0.0 0.0 1000.0 0.0
/// C1 c 3.0 4.0 10.0 0.0 1000.0 10.0
///
/// Q Vehicle fuel tank capacity /60.0/
/// C Vehicle load capacity /100.0/
/// r fuel consumption rate /1.0/
/// ";
/// let inst = instance::parse("tiny", text).unwrap();
/// assert_eq!(inst.problem.num_nodes(), 3);
/// assert_eq!(inst.problem.customers(), &[2]);
/// assert_eq!(inst.problem.vehicle().load_capacity(), 100);
/// ```
pub fn parse(name: &str, text: &str) -> Result<Instance, InstanceError> {
    let mut nodes = Vec::new();
    let mut params = Parameters::default();

    for (line_idx, content) in text.lines().enumerate() {
        let line = line_idx + 1;
        match classify(content) {
            Line::Node(row) => {
                let node = build_node(nodes.len(), line, &row)?;
                trace!(line, id = row.id, index = node.index(), kind = ?node.kind(), "node row");
                nodes.push(node);
            }
            Line::Parameter { key, value } => {
                let number: f64 = value.parse().map_err(|_| InstanceError::InvalidParameter {
                    line,
                    key,
                    value: value.to_string(),
                })?;
                params.set(key, number);
            }
            Line::Ignored => trace!(line, "skipping line"),
            Line::MalformedNode => {
                return Err(InstanceError::MalformedNode {
                    line,
                    content: content.to_string(),
                })
            }
            Line::MalformedParameter => {
                return Err(InstanceError::MalformedParameter {
                    line,
                    content: content.to_string(),
                })
            }
        }
    }

    let vehicle = params.into_vehicle()?;
    let problem = ProblemDefinition::new(nodes, vehicle)?;
    debug!(
        instance = name,
        nodes = problem.num_nodes(),
        chargers = problem.chargers().len(),
        customers = problem.num_customers(),
        min_subtours = problem.minimum_subtours(),
        "parsed instance"
    );

    Ok(Instance {
        name: name.to_string(),
        problem,
    })
}

/// Reads and parses an instance file. The instance is named after the file.
pub fn load(path: impl AsRef<Path>) -> Result<Instance, InstanceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| InstanceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse(&name, &text)
}
