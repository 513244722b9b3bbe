pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Scene(#[from] maquette_scene::Error),

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document {collection} entry references missing node [{id}]")]
    DanglingReference { collection: &'static str, id: String },

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },
}
