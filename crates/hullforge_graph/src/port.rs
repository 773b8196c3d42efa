// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.
//!
//! Ports are small integers scoped per node. A node kind declares its input
//! and output ports statically; the index into that declaration is the port
//! number used by edges and the output cache.

use serde::{Deserialize, Serialize};

/// Port number, scoped to a single node
pub type PortIndex = u16;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Data type that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Triangle mesh
    Mesh,
    /// Boolean value
    Bool,
    /// Floating point value
    Float,
    /// Any type (for generic nodes)
    Any,
}

impl PortType {
    /// Check if this type can connect to another type
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        if matches!(self, Self::Any) || matches!(other, Self::Any) {
            return true;
        }

        self == other
    }
}

/// Static declaration of a port on a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    /// Port name
    pub name: &'static str,
    /// Data type
    pub port_type: PortType,
}

impl Port {
    /// Declare a port
    pub const fn new(name: &'static str, port_type: PortType) -> Self {
        Self { name, port_type }
    }

    /// Check if a connection from this output to `input` is valid
    pub fn can_connect(&self, input: &Port) -> bool {
        self.port_type.can_connect_to(&input.port_type)
    }
}
