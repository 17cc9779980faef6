mod batch;


pub use batch::Batch;

use crate::{
    codec::{CreateResult, QueryResult, UpsertResult},
    config::{ClientConfig, MappingConfig},
    error::Error,
    executor::{Executor, Operation},
    model::object::ObjectDescriptor,
    query::{CompileOptions, QueryCompiler},
    registry::Registry,
    traits::Record,
    transport::Transport,
};
use std::sync::Arc;

///
/// Session
///
/// Entry point for record operations against one remote instance.
/// Single-operation calls block until their round trip finishes and return
/// the operation's own error; [`Batch`] queues many and sends them together.
///

pub struct Session {
    registry: Arc<Registry>,
    executor: Executor,
}

impl Session {
    /// Session over the process-wide registry for `mapping`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, mapping: &MappingConfig, config: ClientConfig) -> Self {
        Self::with_registry(transport, Registry::shared(mapping), config)
    }

    #[must_use]
    pub fn with_registry(
        transport: Arc<dyn Transport>,
        registry: Arc<Registry>,
        config: ClientConfig,
    ) -> Self {
        Self {
            registry,
            executor: Executor::new(transport, config),
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// Start collecting operations for batched execution.
    #[must_use]
    pub fn batch(&self) -> Batch<'_> {
        Batch::new(self)
    }

    /// Descriptor of a record type.
    pub fn descriptor<T: Record>(&self) -> Result<Arc<ObjectDescriptor>, Error> {
        self.registry.descriptor_of::<T>()
    }

    /// Compile a query template rooted at `T` without sending it.
    pub fn compile<T: Record>(&self, template: &str, options: &CompileOptions) -> Result<String, Error> {
        let root = self.registry.descriptor_of::<T>()?;

        QueryCompiler::new(&self.registry).compile(&root, template, options)
    }

    /// Compile options with the session's default depth.
    #[must_use]
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default().depth(self.config().default_depth)
    }

    //
    // single-operation calls
    //

    pub fn create<T: Record>(&self, record: &T) -> Result<CreateResult, Error> {
        self.run(|batch| batch.create(record))
    }

    pub fn get<T: Record>(&self, id: &str) -> Result<T, Error> {
        self.run(|batch| batch.get::<T>(id))
    }

    pub fn update<T: Record>(&self, record: &T) -> Result<(), Error> {
        self.run(|batch| batch.update(record))
    }

    pub fn patch<T: Record>(&self, record: &T) -> Result<(), Error> {
        self.run(|batch| batch.patch(record))
    }

    pub fn upsert<T: Record>(&self, external_field: &str, record: &T) -> Result<UpsertResult, Error> {
        self.run(|batch| batch.upsert(external_field, record))
    }

    pub fn delete<T: Record>(&self, id: &str) -> Result<(), Error> {
        self.run(|batch| batch.delete::<T>(id))
    }

    pub fn query<T: Record>(&self, template: &str) -> Result<QueryResult<T>, Error> {
        let options = self.compile_options();
        self.run(|batch| batch.query_with::<T>(template, &options))
    }

    pub fn query_all<T: Record>(&self, template: &str) -> Result<QueryResult<T>, Error> {
        let options = self.compile_options();
        self.run(|batch| batch.query_all_with::<T>(template, &options))
    }

    fn run<T>(
        &self,
        submit: impl FnOnce(&mut Batch<'_>) -> Result<Operation<T>, Error>,
    ) -> Result<T, Error> {
        let mut batch = self.batch();
        let operation = submit(&mut batch)?;
        batch.execute();

        operation.into_result()
    }

    pub(crate) const fn executor(&self) -> &Executor {
        &self.executor
    }
}
