#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("edge {edge_id} references missing node {node_id}")]
    MissingNode { edge_id: String, node_id: String },
    #[error("duplicate node id {node_id}")]
    DuplicateNodeId { node_id: String },
    #[error("layout produced a non-finite position for node {node_id}")]
    NonFinitePosition { node_id: String },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
