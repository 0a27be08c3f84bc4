//! Parsed netlist types.

use std::collections::BTreeSet;

use crate::GROUND_NODE;

/// Complete representation of a parsed `.circuit` block.
#[derive(Debug, Clone)]
pub struct Netlist {
    /// Component definitions in file order (duplicates already collapsed)
    pub components: Vec<ComponentDef>,
    /// Distinct non-ground node names, iterated in sorted order
    pub nodes: BTreeSet<String>,
    /// Voltage source name of every `V` line in file order, repeats included.
    /// Each entry reserves one branch unknown in the MNA system.
    pub branches: Vec<String>,
    /// Name of the reference node the netlist was parsed against
    pub ground: String,
}

impl Default for Netlist {
    fn default() -> Self {
        Self::new(GROUND_NODE)
    }
}

impl Netlist {
    /// Create a new empty netlist referenced to the given ground node.
    pub fn new(ground: impl Into<String>) -> Self {
        Self {
            components: Vec::new(),
            nodes: BTreeSet::new(),
            branches: Vec::new(),
            ground: ground.into(),
        }
    }

    /// Look up a component definition by name.
    pub fn component(&self, name: &str) -> Option<&ComponentDef> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Number of branch unknowns: one per `V` line, repeated names included.
    pub fn voltage_source_count(&self) -> usize {
        self.branches.len()
    }

    /// Branch slot of a voltage source. A repeated name resolves to the slot
    /// of its last line; the earlier slots stay unstamped.
    pub fn branch_of(&self, name: &str) -> Option<usize> {
        self.branches.iter().rposition(|b| b == name)
    }

    /// Whether `name` is the reference node.
    pub fn is_ground(&self, name: &str) -> bool {
        name == self.ground
    }
}

/// A single component line from the netlist.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDef {
    /// Component kind, taken from the first character of the name
    pub kind: ComponentKind,
    /// Component name (e.g. `R1`, `Vin`)
    pub name: String,
    /// Terminal node names: `[n1, n2]`
    pub nodes: [String; 2],
    /// Resistance in ohms, or source value in volts/amps
    pub value: f64,
    /// Source line number (1-indexed) for error reporting
    pub line: usize,
}

/// Component kinds accepted in a netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Resistor
    Resistor,
    /// Independent voltage source
    VoltageSource,
    /// Independent current source
    CurrentSource,
}

impl ComponentKind {
    /// Parse a component kind from the leading character of its name.
    ///
    /// Matching is case-sensitive: `r1` is not a resistor.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'R' => Some(Self::Resistor),
            'V' => Some(Self::VoltageSource),
            'I' => Some(Self::CurrentSource),
            _ => None,
        }
    }

    /// Minimum number of whitespace-separated tokens on the line.
    ///
    /// `R<id> n1 n2 value` has four; sources carry an extra placeholder
    /// (`V<id> n1 n2 dc value`) and need five.
    pub fn min_tokens(&self) -> usize {
        match self {
            Self::Resistor => 4,
            Self::VoltageSource | Self::CurrentSource => 5,
        }
    }

    /// Index of the token holding the magnitude.
    pub fn value_token(&self) -> usize {
        self.min_tokens() - 1
    }
}
