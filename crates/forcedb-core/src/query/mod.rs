//! Query template compiler.
//!
//! A template is ordinary query text in which `*` and `path.*` stand for
//! "every field of the object reached by `path`". Compilation replaces each
//! wildcard with an explicit field list built from descriptors, then appends
//! the optional `LIMIT` / `OFFSET` clauses.
//!
//! Only the text before the first string literal is scanned; everything from
//! the first `'` onward is copied through untouched.

mod expand;
mod template;


pub use expand::ExpansionCache;
pub use template::split_at_literal;

use crate::{
    config::DEFAULT_DEPTH,
    error::Error,
    model::{field::FieldDescriptor, object::ObjectDescriptor},
    registry::Registry,
};

///
/// CompileOptions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompileOptions {
    /// Relationship levels expanded below the wildcard's object.
    pub depth: usize,

    /// Appended as `LIMIT n` when non-zero.
    pub limit: u32,

    /// Appended as `OFFSET n` when non-zero.
    pub offset: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            limit: 0,
            offset: 0,
        }
    }
}

impl CompileOptions {
    #[must_use]
    pub const fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

///
/// QueryCompiler
///
/// Stateless front end over the registry's expansion cache.
///

#[derive(Clone, Copy)]
pub struct QueryCompiler<'a> {
    registry: &'a Registry,
}

impl<'a> QueryCompiler<'a> {
    #[must_use]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Compile `template` against `root`.
    pub fn compile(
        &self,
        root: &ObjectDescriptor,
        template: &str,
        options: &CompileOptions,
    ) -> Result<String, Error> {
        let mut query = template::substitute(template, |wildcard| {
            self.expand_wildcard(root, wildcard, options.depth)
        })?;

        if options.limit > 0 {
            query.push_str(&format!(" LIMIT {}", options.limit));
        }
        if options.offset > 0 {
            query.push_str(&format!(" OFFSET {}", options.offset));
        }

        Ok(query)
    }

    /// Comma-separated field list for one descriptor (cached).
    pub fn field_list(
        &self,
        descriptor: &ObjectDescriptor,
        prefix: &str,
        depth: usize,
    ) -> Result<String, Error> {
        expand::expand(self.registry, descriptor, prefix, depth).map(|list| list.to_string())
    }

    // Follow `path.` from the root and expand the object it reaches.
    fn expand_wildcard(
        &self,
        root: &ObjectDescriptor,
        wildcard: &template::Wildcard<'_>,
        depth: usize,
    ) -> Result<String, Error> {
        let mut segments = wildcard.segments.as_slice();

        // `Root.*` qualifies the root object itself
        if let [first, rest @ ..] = segments
            && first.eq_ignore_ascii_case(root.name())
            && root.field(first).is_none()
        {
            segments = rest;
        }

        let mut current = self
            .registry
            .get(root.id())
            .ok_or_else(|| Error::QueryCompile(format!("'{}' is not published", root.name())))?;
        let mut prefix = String::new();

        for segment in segments {
            let field = find_field(&current, segment).ok_or_else(|| {
                Error::QueryCompile(format!(
                    "'{}' has no field '{segment}' (in '{}')",
                    current.name(),
                    wildcard.text
                ))
            })?;
            if !field.is_reference() {
                return Err(Error::QueryCompile(format!(
                    "'{}.{}' is not a single-valued relationship (in '{}')",
                    current.name(),
                    field.name(),
                    wildcard.text
                )));
            }

            let next = self.registry.related(field).ok_or_else(|| {
                Error::QueryCompile(format!(
                    "polymorphic field '{}.{}' has no default and cannot be traversed",
                    current.name(),
                    field.name()
                ))
            })?;
            prefix.push_str(field.name());
            prefix.push('.');
            current = next;
        }

        let remaining = depth.saturating_sub(segments.len());
        let list = expand::expand(self.registry, &current, &prefix, remaining)?;
        if list.is_empty() {
            return Err(Error::QueryCompile(format!(
                "'{}' expands to no fields",
                wildcard.text
            )));
        }

        Ok(list.to_string())
    }
}

// Field names in the query dialect are case-insensitive.
fn find_field<'d>(descriptor: &'d ObjectDescriptor, name: &str) -> Option<&'d FieldDescriptor> {
    descriptor.field(name).or_else(|| {
        descriptor
            .fields()
            .iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    })
}
