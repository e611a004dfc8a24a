use thiserror::Error;

/// Why an operation on a queue handle or the table was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalOperation {
    #[error("slot {index} does not hold a queue")]
    InvalidHandle { index: usize },

    #[error("handle for slot {index} refers to a queue that was destroyed")]
    StaleHandle { index: usize },

    #[error("all queue slots are in use")]
    TableFull,

    #[error("queue in slot {index} is empty")]
    EmptyQueue { index: usize },
}

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("out of memory: usage {usage} + {requested} exceeds capacity {capacity}")]
    OutOfMemory {
        usage: u16,
        requested: u16,
        capacity: u16,
    },

    #[error("illegal operation: {0}")]
    IllegalOperation(#[from] IllegalOperation),

    #[error("invalid capacity {capacity}: must be within {min}..={max}")]
    InvalidCapacity { capacity: usize, min: u16, max: u16 },

    #[error("corrupt arena image: {0}")]
    CorruptImage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArenaError {
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, ArenaError::OutOfMemory { .. })
    }

    pub fn is_illegal_operation(&self) -> bool {
        matches!(self, ArenaError::IllegalOperation(_))
    }

    /// The refused-operation reason, if this is an `IllegalOperation`.
    pub fn illegal_reason(&self) -> Option<IllegalOperation> {
        match self {
            ArenaError::IllegalOperation(reason) => Some(*reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArenaError>;
