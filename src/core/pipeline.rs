use async_trait::async_trait;

/// A synchronous unit of work over a shared context
pub trait BlockingTask<T, E>: Send + Sync {
    fn run(&self, context: &T) -> Result<(), E>;
}

/// An async unit of work over a shared context
#[async_trait]
pub trait AsyncTask<T: Send + Sync, E>: Send + Sync {
    async fn run(&self, context: &T) -> Result<(), E>;
}

enum Stage<T: Send + Sync, E> {
    Blocking(Box<dyn BlockingTask<T, E>>),
    Async(Box<dyn AsyncTask<T, E>>),
}

/// Ordered tasks run one after another against the same context.
/// The first task to fail aborts the remainder and its error is returned.
pub struct Pipeline<T: Send + Sync, E> {
    stages: Vec<Stage<T, E>>,
}

impl<T: Send + Sync, E> Pipeline<T, E> {
    pub async fn run(&self, context: &T) -> Result<(), E> {
        for stage in &self.stages {
            match stage {
                Stage::Blocking(task) => task.run(context)?,
                Stage::Async(task) => task.run(context).await?,
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }
}

pub struct PipelineBuilder<T: Send + Sync, E> {
    stages: Vec<Stage<T, E>>,
}

impl<T: Send + Sync, E> Default for PipelineBuilder<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync, E> PipelineBuilder<T, E> {
    pub fn new() -> Self {
        PipelineBuilder { stages: Vec::new() }
    }

    pub fn with_blocking(mut self, task: Box<dyn BlockingTask<T, E>>) -> Self {
        self.add_blocking(task);
        self
    }

    pub fn with_async(mut self, task: Box<dyn AsyncTask<T, E>>) -> Self {
        self.add_async(task);
        self
    }

    pub fn add_blocking(&mut self, task: Box<dyn BlockingTask<T, E>>) {
        self.stages.push(Stage::Blocking(task));
    }

    pub fn add_async(&mut self, task: Box<dyn AsyncTask<T, E>>) {
        self.stages.push(Stage::Async(task));
    }

    /// None when no tasks were added
    pub fn build(self) -> Option<Pipeline<T, E>> {
        if self.stages.is_empty() {
            return None;
        }

        Some(Pipeline {
            stages: self.stages,
        })
    }
}
