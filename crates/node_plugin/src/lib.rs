pub mod error;
pub mod jsonrpc;
pub mod node;
pub mod plugin;
pub mod registry;
pub mod runtime;
pub mod value;

pub use error::NodeError;
pub use node::{
    Connection, ExecutorKind, NodeDefinition, NodeId, NodeInstance, NodeUiData, PortDescriptor,
    PortId, ProcessContext, Project, VisualData,
};
pub use registry::NodeRegistry;
pub use value::{DataType, DataValue, Inputs, Outputs};
