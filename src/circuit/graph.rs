//! Circuit graph structure.

use std::collections::HashMap;

use tracing::debug;

use super::types::{BranchId, NodeId};
use crate::components::{Component, CurrentSource, Resistor, VoltageSource};
use crate::netlist::{ComponentDef, ComponentKind, Netlist};

/// A complete circuit ready for DC analysis.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// All components, in netlist order
    pub components: Vec<Component>,

    /// Mapping from node names to node IDs (ground excluded)
    pub node_map: HashMap<String, NodeId>,

    /// Reverse mapping from node IDs to names; entry 0 is ground
    pub node_names: Vec<String>,

    /// Number of nodes (including ground)
    pub num_nodes: usize,

    /// Number of branch current variables (one per voltage source)
    pub num_branches: usize,
}

impl Circuit {
    /// Build a circuit from a parsed netlist.
    ///
    /// Nodes are numbered in the iteration order of `netlist.nodes`, with the
    /// netlist's own ground name as node 0. Every `V` line owns a branch
    /// slot; a repeated source name binds to the slot of its last line.
    pub fn from_netlist(netlist: &Netlist) -> Self {
        let mut node_map = HashMap::with_capacity(netlist.nodes.len());
        let mut node_names = Vec::with_capacity(netlist.nodes.len() + 1);
        node_names.push(netlist.ground.clone());

        for name in &netlist.nodes {
            node_map.insert(name.clone(), NodeId(node_names.len()));
            node_names.push(name.clone());
        }

        let components: Vec<Component> = netlist
            .components
            .iter()
            .map(|def| {
                let nodes = [
                    Self::resolve(netlist, &node_map, &def.nodes[0]),
                    Self::resolve(netlist, &node_map, &def.nodes[1]),
                ];
                Self::build_component(netlist, def, nodes)
            })
            .collect();

        let num_nodes = node_names.len();
        let num_branches = netlist.voltage_source_count();
        debug!(
            nodes = num_nodes - 1,
            branches = num_branches,
            components = components.len(),
            "built circuit"
        );

        Circuit {
            components,
            node_map,
            node_names,
            num_nodes,
            num_branches,
        }
    }

    fn resolve(netlist: &Netlist, node_map: &HashMap<String, NodeId>, name: &str) -> NodeId {
        if netlist.is_ground(name) {
            return NodeId::GROUND;
        }
        // Every non-ground terminal was put into `netlist.nodes` while parsing.
        node_map[name]
    }

    fn build_component(netlist: &Netlist, def: &ComponentDef, nodes: [NodeId; 2]) -> Component {
        match def.kind {
            ComponentKind::Resistor => {
                Component::Resistor(Resistor::new(def.name.clone(), nodes, def.value))
            }
            ComponentKind::VoltageSource => {
                // The parser records a branch for every `V` line.
                let branch = BranchId(netlist.branch_of(&def.name).unwrap_or_default());
                Component::VoltageSource(VoltageSource::new(def.name.clone(), nodes, def.value, branch))
            }
            ComponentKind::CurrentSource => {
                Component::CurrentSource(CurrentSource::new(def.name.clone(), nodes, def.value))
            }
        }
    }

    /// Get the total size of the MNA solution vector.
    pub fn matrix_size(&self) -> usize {
        // Nodes (excluding ground) + branch currents
        (self.num_nodes - 1) + self.num_branches
    }

    /// Get the matrix index for a node voltage.
    /// Returns None for ground (node 0).
    pub fn node_index(&self, node: NodeId) -> Option<usize> {
        if node.is_ground() {
            None
        } else {
            Some(node.0 - 1)
        }
    }

    /// Get the matrix index for a branch current.
    pub fn branch_index(&self, branch: BranchId) -> usize {
        (self.num_nodes - 1) + branch.0
    }

    /// Find a node ID by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        if name == self.node_names[0] {
            Some(NodeId::GROUND)
        } else {
            self.node_map.get(name).copied()
        }
    }

    /// Get the name of a node.
    pub fn node_name(&self, node: NodeId) -> &str {
        &self.node_names[node.0]
    }

    /// Name of the ground node.
    pub fn ground_name(&self) -> &str {
        &self.node_names[0]
    }

    /// Iterate over the voltage sources with their branch ids.
    pub fn voltage_sources(&self) -> impl Iterator<Item = &VoltageSource> {
        self.components.iter().filter_map(|c| match c {
            Component::VoltageSource(v) => Some(v),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist;

    #[test]
    fn test_indices() {
        let netlist = netlist::parse(
            ".circuit\nV1 b GND dc 1\nR1 a b 1\nR2 a GND 1\nV2 a b dc 2\n.end",
        )
        .unwrap();
        let circuit = Circuit::from_netlist(&netlist);

        assert_eq!(circuit.num_nodes, 3);
        assert_eq!(circuit.num_branches, 2);
        assert_eq!(circuit.matrix_size(), 4);

        let a = circuit.find_node("a").unwrap();
        let b = circuit.find_node("b").unwrap();
        assert_eq!(circuit.node_index(a), Some(0));
        assert_eq!(circuit.node_index(b), Some(1));
        assert_eq!(circuit.node_index(NodeId::GROUND), None);
        assert_eq!(circuit.find_node("GND"), Some(NodeId::GROUND));
        assert_eq!(circuit.node_name(b), "b");

        let branches: Vec<(&str, usize)> = circuit
            .voltage_sources()
            .map(|v| (v.name.as_str(), circuit.branch_index(v.branch)))
            .collect();
        assert_eq!(branches, vec![("V1", 2), ("V2", 3)]);
        assert_eq!(circuit.components[1].nodes(), [a, b]);
        assert_eq!(circuit.components[1].value(), 1.0);
    }

    #[test]
    fn test_ground_only_circuit() {
        let netlist = netlist::parse(".circuit\nV1 GND GND dc 1\n.end").unwrap();
        let circuit = Circuit::from_netlist(&netlist);
        assert_eq!(circuit.num_nodes, 1);
        assert_eq!(circuit.matrix_size(), 1);
    }

    #[test]
    fn test_repeated_source_reserves_dead_branch() {
        let netlist =
            netlist::parse(".circuit\nV1 a GND dc 5\nR1 a GND 1\nV1 a GND dc 3\n.end").unwrap();
        let circuit = Circuit::from_netlist(&netlist);

        assert_eq!(circuit.num_branches, 2);
        assert_eq!(circuit.matrix_size(), 3);
        let sources: Vec<_> = circuit.voltage_sources().collect();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].branch, BranchId(1));
        assert_eq!(sources[0].voltage, 3.0);
    }

    #[test]
    fn test_ground_name_comes_from_netlist() {
        let options = netlist::ParseOptions::new().with_ground("0");
        let netlist = netlist::parse_with(".circuit\nR1 a 0 1\nR2 a GND 1\n.end", &options).unwrap();
        let circuit = Circuit::from_netlist(&netlist);

        assert_eq!(circuit.ground_name(), "0");
        assert_eq!(circuit.find_node("0"), Some(NodeId::GROUND));
        let gnd = circuit.find_node("GND").unwrap();
        assert!(!gnd.is_ground());
        assert_eq!(circuit.components[1].nodes(), [circuit.find_node("a").unwrap(), gnd]);
    }
}
