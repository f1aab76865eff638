pub mod analysis;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod suggest;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, LayoutType, RelaxationConfig, load_config};
pub use error::LayoutError;
pub use ir::{Bounds, Edge, GraphDocument, Node, NodeData, Point, Size};
pub use layout::{
    LayoutOutcome, apply_strategy, calculate_positions, calculate_positions_with_report,
    validate_graph,
};
pub use suggest::{LayoutSuggestion, SuggestionTrigger, suggest_layout, validate_layout};
