use crate::node::NodeKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Schema violation ({kind}): {message}")]
    SchemaViolation { kind: NodeKind, message: String },

    #[error("A {child} cannot be a child of a {parent}")]
    ChildNotAllowed { parent: NodeKind, child: NodeKind },

    #[error("Node id [{id}] is already in use")]
    DuplicateId { id: String },

    #[error("Node [{id}] does not exist")]
    NotFound { id: String },

    #[error("Reparenting [{id}] under [{new_parent}] would create a cycle")]
    Cycle { id: String, new_parent: String },
}
