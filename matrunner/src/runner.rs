// Matrix Runner
// Builds the combination list of a matrix definition and hands it to an engine

use crate::engine::{
    Engine, EngineRegistry, ProgressSender, SequentialEngine, Target, DEFAULT_ENGINE,
};
use crate::matrix::{Combination, MatrixDefinition, MatrixParser, Value};
use crate::{MatrixError, MatrixResult};

use serde::{Deserialize, Serialize};

/// How a runner obtains its engine
pub enum EngineChoice<R, E> {
    /// A ready-made engine, used as is
    Engine(Box<dyn Engine<R, E>>),
    /// A plain target, wrapped in the sequential engine
    Function(Target<R, E>),
}

impl<R, E> From<Target<R, E>> for EngineChoice<R, E> {
    fn from(target: Target<R, E>) -> Self {
        EngineChoice::Function(target)
    }
}

impl<R, E> From<Box<dyn Engine<R, E>>> for EngineChoice<R, E> {
    fn from(engine: Box<dyn Engine<R, E>>) -> Self {
        EngineChoice::Engine(engine)
    }
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Registry name of the engine to dispatch with
    #[serde(default = "default_engine")]
    pub engine: String,
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
        }
    }
}

/// Runs a target once per combination of a matrix definition
pub struct MatrixRunner<R, E> {
    engine: Box<dyn Engine<R, E>>,
}

impl<R, E> MatrixRunner<R, E>
where
    R: 'static,
    E: From<MatrixError> + 'static,
{
    /// Create a runner from an engine or a plain target
    pub fn new(choice: impl Into<EngineChoice<R, E>>) -> Self {
        let engine: Box<dyn Engine<R, E>> = match choice.into() {
            EngineChoice::Engine(engine) => engine,
            EngineChoice::Function(target) => Box::new(SequentialEngine::new(target)),
        };
        Self { engine }
    }

    /// Create a runner using the engine registered under `name`
    pub fn from_registry(
        registry: &EngineRegistry<R, E>,
        name: &str,
        target: Target<R, E>,
        progress: Option<ProgressSender>,
    ) -> MatrixResult<Self> {
        let engine = registry.build(name, target, progress)?;
        Ok(Self { engine })
    }

    /// Create a runner using the engine selected by a configuration
    pub fn from_config(
        registry: &EngineRegistry<R, E>,
        config: &RunnerConfig,
        target: Target<R, E>,
        progress: Option<ProgressSender>,
    ) -> MatrixResult<Self> {
        Self::from_registry(registry, &config.engine, target, progress)
    }

    pub fn engine(&self) -> &dyn Engine<R, E> {
        self.engine.as_ref()
    }

    /// Name of the target being dispatched
    pub fn name(&self) -> &str {
        self.engine.name()
    }

    /// Final combination list of a definition, without dispatching it
    pub fn combinations(&self, definition: &MatrixDefinition) -> Vec<Combination> {
        definition.combinations()
    }

    /// Dispatch every combination of a definition as keyword arguments.
    ///
    /// Results are returned in combination order; the first failure of the
    /// target is returned unmodified.
    pub fn run(&self, definition: &MatrixDefinition) -> Result<Vec<R>, E> {
        let combinations = definition.combinations();
        tracing::debug!(
            target_fn = self.name(),
            combinations = combinations.len(),
            "running matrix"
        );
        self.engine.run(None, Some(combinations))
    }

    /// Validate untyped matrix, include and exclude inputs, then dispatch.
    ///
    /// Validation happens before anything is expanded or invoked.
    pub fn run_values(
        &self,
        matrix: &Value,
        include: Option<&Value>,
        exclude: Option<&Value>,
    ) -> Result<Vec<R>, E> {
        let definition = MatrixParser::from_parts(matrix, include, exclude)?;
        self.run(&definition)
    }
}
