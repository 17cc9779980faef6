use super::{
    operation::Operation,
    paths::RestPaths,
    request::{Pending, PendingOperation, Reply, ResponseContext, SubRequest},
};
use crate::{
    codec::{Codec, CreateResult, QueryEnvelope, QueryResult, UpsertResult, WriteIntent},
    error::Error,
    query::{CompileOptions, QueryCompiler},
    registry::Registry,
    traits::Record,
    transport::Method,
};
use serde_json::Value;
use std::sync::Arc;

/// An operation handle plus the queued work that will complete it.
pub(crate) type Planned<T> = (Operation<T>, Box<dyn PendingOperation>);

///
/// Planner
///
/// Turns typed calls into serialized sub-requests. All encoding happens
/// here, at submission time, so a bad record fails before any I/O.
///

pub(crate) struct Planner<'a> {
    registry: &'a Arc<Registry>,
    paths: &'a RestPaths,
}

impl<'a> Planner<'a> {
    pub(crate) const fn new(registry: &'a Arc<Registry>, paths: &'a RestPaths) -> Self {
        Self { registry, paths }
    }

    fn codec(&self) -> Codec<'a> {
        Codec::new(self.registry)
    }

    pub(crate) fn create<T: Record>(&self, record: &T) -> Result<Planned<CreateResult>, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let body = self.codec().encode(record, WriteIntent::Create)?;
        let request = SubRequest::new(Method::Post, self.paths.sobject(descriptor.name()), Some(body));

        Ok(plan(request, |_, reply| {
            let body = reply.into_body(None)?.unwrap_or_default();
            Ok(serde_json::from_value(body)?)
        }))
    }

    pub(crate) fn get<T: Record>(&self, id: &str) -> Result<Planned<T>, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let fields = QueryCompiler::new(self.registry).field_list(&descriptor, "", 0)?;
        let url = RestPaths::with_param(&self.paths.record(descriptor.name(), id), "fields", &fields);
        let request = SubRequest::new(Method::Get, url, None);

        let registry = Arc::clone(self.registry);
        let missing = format!("{} '{id}'", descriptor.name());

        Ok(plan(request, move |_, reply| {
            let body = reply.into_body(Some(&missing))?.unwrap_or_default();
            Codec::new(&registry).decode(body)
        }))
    }

    pub(crate) fn update<T: Record>(&self, record: &T) -> Result<Planned<()>, Error> {
        self.write(record, WriteIntent::Update)
    }

    pub(crate) fn patch<T: Record>(&self, record: &T) -> Result<Planned<()>, Error> {
        self.write(record, WriteIntent::Patch)
    }

    // Both update flavours address the record by its id.
    fn write<T: Record>(&self, record: &T, intent: WriteIntent) -> Result<Planned<()>, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let id = self.codec().record_id(record)?.ok_or_else(|| {
            Error::codec(format!(
                "{intent} of '{}' requires a populated id",
                descriptor.name()
            ))
        })?;
        let body = self.codec().encode(record, intent)?;
        let request = SubRequest::new(
            Method::Patch,
            self.paths.record(descriptor.name(), &id),
            Some(body),
        );

        Ok(plan(request, |_, reply| reply.into_body(None).map(drop)))
    }

    /// Create-or-update addressed by an external key field.
    pub(crate) fn upsert<T: Record>(
        &self,
        external_field: &str,
        record: &T,
    ) -> Result<Planned<UpsertResult>, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let field = descriptor.field(external_field).ok_or_else(|| {
            Error::codec(format!(
                "'{}' has no field '{external_field}'",
                descriptor.name()
            ))
        })?;

        let raw = serde_json::to_value(record)?;
        let key = match raw.get(field.name()) {
            Some(Value::String(key)) if !key.is_empty() => key.clone(),
            Some(Value::Number(key)) => key.to_string(),
            _ => {
                return Err(Error::codec(format!(
                    "upsert of '{}' requires a value for '{}'",
                    descriptor.name(),
                    field.name()
                )));
            }
        };

        let mut body = self.codec().encode_value(&descriptor, raw, WriteIntent::Create)?;
        if let Value::Object(object) = &mut body {
            object.remove(field.name());
        }
        let url = self.paths.external(descriptor.name(), field.name(), &key);
        let request = SubRequest::new(Method::Patch, url, Some(body));

        Ok(plan(request, |_, reply| {
            let created = reply.status == 201;
            let mut result = match reply.into_body(None)? {
                Some(body) => serde_json::from_value::<UpsertResult>(body)?,
                None => UpsertResult::default(),
            };
            result.created |= created;

            Ok(result)
        }))
    }

    pub(crate) fn delete<T: Record>(&self, id: &str) -> Result<Planned<()>, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let request = SubRequest::new(Method::Delete, self.paths.record(descriptor.name(), id), None);

        Ok(plan(request, |_, reply| reply.into_body(None).map(drop)))
    }

    pub(crate) fn query<T: Record>(
        &self,
        template: &str,
        options: &CompileOptions,
        include_deleted: bool,
    ) -> Result<Planned<QueryResult<T>>, Error> {
        let descriptor = self.registry.descriptor_of::<T>()?;
        let query = QueryCompiler::new(self.registry).compile(&descriptor, template, options)?;
        let url = if include_deleted {
            self.paths.query_all(&query)
        } else {
            self.paths.query(&query)
        };
        let request = SubRequest::new(Method::Get, url, None);
        let registry = Arc::clone(self.registry);

        Ok(plan(request, move |context, reply| {
            let envelope = collect_pages(context, reply)?;
            Codec::new(&registry).decode_query(envelope)
        }))
    }
}

fn plan<T, F>(request: SubRequest, handle: F) -> Planned<T>
where
    T: Send + Sync + 'static,
    F: FnOnce(&ResponseContext<'_>, Reply) -> Result<T, Error> + Send + 'static,
{
    let (operation, completer) = Operation::pending();

    (operation, Pending::boxed(request, completer, handle))
}

// Accumulate continuation pages into the first envelope.
fn collect_pages(context: &ResponseContext<'_>, reply: Reply) -> Result<QueryEnvelope, Error> {
    let body = reply.into_body(None)?.unwrap_or_default();
    let mut envelope = serde_json::from_value::<QueryEnvelope>(body)?;

    while !envelope.done {
        let Some(next) = envelope.next_records_url.take() else {
            break;
        };
        let page = context.follow(&next)?;
        envelope.records.extend(page.records);
        envelope.done = page.done;
        envelope.next_records_url = page.next_records_url;
    }

    Ok(envelope)
}
