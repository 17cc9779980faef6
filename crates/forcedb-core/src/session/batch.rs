use super::Session;
use crate::{
    codec::{CreateResult, QueryResult, UpsertResult},
    error::Error,
    executor::{Operation, PendingOperation, Planner},
    query::CompileOptions,
    traits::Record,
};

///
/// Batch
///
/// Collects operations and sends them together on [`Batch::execute`].
/// Every submission is encoded immediately; a submission that fails to
/// encode returns its error and is not queued.
///

pub struct Batch<'s> {
    session: &'s Session,
    pending: Vec<Box<dyn PendingOperation>>,
}

impl<'s> Batch<'s> {
    pub(crate) const fn new(session: &'s Session) -> Self {
        Self {
            session,
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn create<T: Record>(&mut self, record: &T) -> Result<Operation<CreateResult>, Error> {
        let planned = self.planner().create(record)?;
        Ok(self.queue(planned))
    }

    pub fn get<T: Record>(&mut self, id: &str) -> Result<Operation<T>, Error> {
        let planned = self.planner().get::<T>(id)?;
        Ok(self.queue(planned))
    }

    pub fn update<T: Record>(&mut self, record: &T) -> Result<Operation<()>, Error> {
        let planned = self.planner().update(record)?;
        Ok(self.queue(planned))
    }

    pub fn patch<T: Record>(&mut self, record: &T) -> Result<Operation<()>, Error> {
        let planned = self.planner().patch(record)?;
        Ok(self.queue(planned))
    }

    pub fn upsert<T: Record>(
        &mut self,
        external_field: &str,
        record: &T,
    ) -> Result<Operation<UpsertResult>, Error> {
        let planned = self.planner().upsert(external_field, record)?;
        Ok(self.queue(planned))
    }

    pub fn delete<T: Record>(&mut self, id: &str) -> Result<Operation<()>, Error> {
        let planned = self.planner().delete::<T>(id)?;
        Ok(self.queue(planned))
    }

    pub fn query<T: Record>(&mut self, template: &str) -> Result<Operation<QueryResult<T>>, Error> {
        let options = self.session.compile_options();
        self.query_with(template, &options)
    }

    pub fn query_with<T: Record>(
        &mut self,
        template: &str,
        options: &CompileOptions,
    ) -> Result<Operation<QueryResult<T>>, Error> {
        let planned = self.planner().query::<T>(template, options, false)?;
        Ok(self.queue(planned))
    }

    /// Like [`Batch::query`], including deleted and archived records.
    pub fn query_all<T: Record>(&mut self, template: &str) -> Result<Operation<QueryResult<T>>, Error> {
        let options = self.session.compile_options();
        self.query_all_with(template, &options)
    }

    pub fn query_all_with<T: Record>(
        &mut self,
        template: &str,
        options: &CompileOptions,
    ) -> Result<Operation<QueryResult<T>>, Error> {
        let planned = self.planner().query::<T>(template, options, true)?;
        Ok(self.queue(planned))
    }

    /// Send everything queued. Outcomes are read from the returned
    /// operations; nothing is raised here.
    pub fn execute(self) {
        self.session.executor().execute(self.pending);
    }

    fn planner(&self) -> Planner<'s> {
        Planner::new(self.session.registry(), self.session.executor().paths())
    }

    fn queue<T>(&mut self, (operation, pending): (Operation<T>, Box<dyn PendingOperation>)) -> Operation<T> {
        self.pending.push(pending);
        operation
    }
}
