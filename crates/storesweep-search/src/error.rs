use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to read cell list {path}: {source}")]
    CellListIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed cell list {path} line {line}: {reason}")]
    CellListParse {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("cell list {path} contains no cells")]
    EmptyCellList { path: String },
}
