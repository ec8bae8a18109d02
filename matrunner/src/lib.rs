// Matrix Runner Library
// Expands parameter matrices into argument combinations and dispatches them to an engine

pub mod engine;
pub mod error;
pub mod matrix;
pub mod runner;

// Re-export commonly used types
pub use error::{MatrixError, MatrixResult};

// Re-export matrix types
pub use matrix::{
    apply_exclude, apply_include, Combination, FilterSpec, Matrix, MatrixDefinition,
    MatrixExpander, MatrixParser, Value,
};

// Re-export engine types
pub use engine::{
    progress_channel, Args, DispatchEvent, Engine, EngineFactory, EngineRegistry, EventSender,
    ProgressReceiver, ProgressSender, SequentialEngine, Target, DEFAULT_ENGINE,
};

// Re-export runner types
pub use runner::{EngineChoice, MatrixRunner, RunnerConfig};
