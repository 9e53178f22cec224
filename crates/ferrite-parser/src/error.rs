use thiserror::Error;

/// Structural errors raised while turning netlist text into a `Circuit`.
///
/// These are never recovered: a malformed line means the simulation never
/// starts.
#[derive(Error, Debug)]
pub enum Error {
    /// Error indicating that the format of the input string is invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Error indicating that a float value in the input string is invalid.
    #[error("Invalid float value: {0}")]
    InvalidFloatValue(String),

    /// A line's leading character or arity does not match any element variant.
    #[error("Invalid element: {0}")]
    InvalidElement(String),

    /// An unrecognized integration or frequency-scale tag on a directive.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Error indicating that an unexpected error occurred.
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// Error indicating that the netlist is empty.
    #[error("The netlist is empty")]
    EmptyNetlist,

    /// Error indicating that a node name in the input string is invalid.
    #[error("Invalid node name: {0}")]
    InvalidNodeName(String),

    /// Error indicating that the netlist has no trailing simulation directive.
    #[error("Missing simulation directive (expected .TRAN or .AC as the last line)")]
    MissingDirective,

    /// Error indicating a parsing failure on a specific line of the netlist.
    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("IO error reading file: {0}")]
    Io(#[from] std::io::Error),
}
