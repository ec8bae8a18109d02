// Engine Module
// Dispatch strategies invoking a target function once per argument set

pub mod events;
pub mod sequential;

// Re-export key types
pub use events::{progress_channel, DispatchEvent, EventSender, ProgressReceiver, ProgressSender};
pub use sequential::SequentialEngine;

use crate::matrix::{Combination, Value};
use crate::{MatrixError, MatrixResult};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Positional arguments of a single invocation
pub type Args = Vec<Value>;

type TargetFn<R, E> = dyn Fn(&[Value], &Combination) -> Result<R, E> + Send + Sync;

/// A named function invoked with positional arguments and a combination
/// of keyword arguments
pub struct Target<R, E> {
    name: String,
    func: Arc<TargetFn<R, E>>,
}

impl<R, E> Target<R, E> {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value], &Combination) -> Result<R, E> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Name of the wrapped function
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the wrapped function once
    pub fn call(&self, args: &[Value], kwargs: &Combination) -> Result<R, E> {
        (self.func)(args, kwargs)
    }
}

impl<R, E> Clone for Target<R, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<R, E> fmt::Debug for Target<R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target").field("name", &self.name).finish()
    }
}

/// Strategy for dispatching argument sets to a target
pub trait Engine<R, E>: Send + Sync {
    /// Name of the wrapped target
    fn name(&self) -> &str;

    /// Invoke the wrapped target directly, bypassing dispatch
    fn call(&self, args: &[Value], kwargs: &Combination) -> Result<R, E>;

    /// Invoke the target once per argument set and collect results in order.
    ///
    /// Either list may be omitted and is then filled with empty argument
    /// sets of the other list's length.
    fn run(
        &self,
        args_list: Option<Vec<Args>>,
        kwargs_list: Option<Vec<Combination>>,
    ) -> Result<Vec<R>, E>;
}

/// Pair positional and keyword argument lists, synthesizing the missing one.
///
/// Fails before anything is invoked when both lists are present with
/// different lengths, or when neither is present.
pub fn pair_argument_lists(
    args_list: Option<Vec<Args>>,
    kwargs_list: Option<Vec<Combination>>,
) -> MatrixResult<Vec<(Args, Combination)>> {
    let (args_list, kwargs_list) = match (args_list, kwargs_list) {
        (None, None) => {
            return Err(MatrixError::invalid_argument(
                "at least one of args_list and kwargs_list is required",
            ))
        }
        (Some(args_list), None) => {
            let kwargs_list = vec![Combination::new(); args_list.len()];
            (args_list, kwargs_list)
        }
        (None, Some(kwargs_list)) => {
            let args_list = vec![Args::new(); kwargs_list.len()];
            (args_list, kwargs_list)
        }
        (Some(args_list), Some(kwargs_list)) => {
            if args_list.len() != kwargs_list.len() {
                return Err(MatrixError::LengthMismatch {
                    args: args_list.len(),
                    kwargs: kwargs_list.len(),
                });
            }
            (args_list, kwargs_list)
        }
    };

    Ok(args_list.into_iter().zip(kwargs_list).collect())
}

/// Builds an engine around a target, optionally reporting progress
pub type EngineFactory<R, E> =
    Arc<dyn Fn(Target<R, E>, Option<ProgressSender>) -> Box<dyn Engine<R, E>> + Send + Sync>;

/// Name of the engine registered by default
pub const DEFAULT_ENGINE: &str = "single_thread";

/// Registry of named engine factories
pub struct EngineRegistry<R, E> {
    factories: HashMap<String, EngineFactory<R, E>>,
}

impl<R, E> EngineRegistry<R, E>
where
    R: 'static,
    E: From<MatrixError> + 'static,
{
    /// Create a registry with the sequential engine registered as `single_thread`
    pub fn new() -> Self {
        Self::empty().with_engine(
            DEFAULT_ENGINE,
            |target, progress| -> Box<dyn Engine<R, E>> {
                Box::new(SequentialEngine::new(target).with_progress(progress))
            },
        )
    }

    /// Create a registry without any engines
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register an engine factory under a name, replacing an existing one
    pub fn with_engine<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Target<R, E>, Option<ProgressSender>) -> Box<dyn Engine<R, E>>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, Arc::new(factory));
        self
    }

    pub fn register(&mut self, name: impl Into<String>, factory: EngineFactory<R, E>) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered engine names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the named engine around a target
    pub fn build(
        &self,
        name: &str,
        target: Target<R, E>,
        progress: Option<ProgressSender>,
    ) -> MatrixResult<Box<dyn Engine<R, E>>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| MatrixError::invalid_argument(format!("Engine {} not found", name)))?;
        Ok(factory(target, progress))
    }
}

impl<R, E> Default for EngineRegistry<R, E>
where
    R: 'static,
    E: From<MatrixError> + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
