//! Parser for `.circuit` netlists.

use std::collections::HashMap;

use tracing::{trace, warn};

use super::ast::*;
use super::lexer::{parse_value, SourceLine};
use crate::error::{Result, SpiceError};
use crate::GROUND_NODE;

/// Options controlling how a netlist is parsed.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name of the reference node (never indexed, always 0 V).
    pub ground: String,
    /// Raise [`SpiceError::DuplicateComponent`] instead of letting the last
    /// definition of a name win.
    pub reject_duplicates: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            ground: GROUND_NODE.to_string(),
            reject_duplicates: false,
        }
    }
}

impl ParseOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ground node name.
    pub fn with_ground(mut self, ground: impl Into<String>) -> Self {
        self.ground = ground.into();
        self
    }

    /// Reject duplicate component names.
    pub fn with_reject_duplicates(mut self, reject: bool) -> Self {
        self.reject_duplicates = reject;
        self
    }
}

/// Parser turning tokenized block lines into a [`Netlist`].
pub struct Parser<'o> {
    options: &'o ParseOptions,
    netlist: Netlist,
    /// Position of each component name in `netlist.components`
    positions: HashMap<String, usize>,
}

impl<'o> Parser<'o> {
    /// Create a new parser.
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            netlist: Netlist::new(options.ground.clone()),
            positions: HashMap::new(),
        }
    }

    /// Parse all lines of the circuit block.
    pub fn parse(mut self, lines: &[SourceLine<'_>]) -> Result<Netlist> {
        for line in lines {
            let component = self.parse_component(line)?;
            self.add_nodes(&component);
            if component.kind == ComponentKind::VoltageSource {
                self.netlist.branches.push(component.name.clone());
            }
            self.insert(component)?;
        }
        Ok(self.netlist)
    }

    fn parse_component(&self, line: &SourceLine<'_>) -> Result<ComponentDef> {
        let tokens = &line.tokens;
        if tokens.len() < 4 {
            return Err(SpiceError::malformed(
                line.number,
                format!("expected at least 4 fields, got {}", tokens.len()),
            ));
        }

        let name = tokens[0];
        let kind = name
            .chars()
            .next()
            .and_then(ComponentKind::from_prefix)
            .ok_or_else(|| SpiceError::UnsupportedElement {
                name: name.to_string(),
                line: line.number,
            })?;

        if tokens.len() < kind.min_tokens() {
            return Err(SpiceError::malformed(
                line.number,
                format!(
                    "source '{}' expects {} fields, got {}",
                    name,
                    kind.min_tokens(),
                    tokens.len()
                ),
            ));
        }

        let text = tokens[kind.value_token()];
        let value = parse_value(text).ok_or_else(|| {
            SpiceError::malformed(line.number, format!("invalid value '{}' for '{}'", text, name))
        })?;

        trace!(line = line.number, name, ?kind, value, "parsed component");

        Ok(ComponentDef {
            kind,
            name: name.to_string(),
            nodes: [tokens[1].to_string(), tokens[2].to_string()],
            value,
            line: line.number,
        })
    }

    fn add_nodes(&mut self, component: &ComponentDef) {
        for node in &component.nodes {
            if !self.netlist.is_ground(node) {
                self.netlist.nodes.insert(node.clone());
            }
        }
    }

    fn insert(&mut self, component: ComponentDef) -> Result<()> {
        match self.positions.get(&component.name) {
            Some(&pos) => {
                if self.options.reject_duplicates {
                    return Err(SpiceError::DuplicateComponent {
                        name: component.name,
                        line: component.line,
                    });
                }
                warn!(
                    name = %component.name,
                    first = self.netlist.components[pos].line,
                    line = component.line,
                    "duplicate component name; later definition replaces earlier one"
                );
                self.netlist.components[pos] = component;
            }
            None => {
                self.positions
                    .insert(component.name.clone(), self.netlist.components.len());
                self.netlist.components.push(component);
            }
        }
        Ok(())
    }
}
