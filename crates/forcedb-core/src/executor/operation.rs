use crate::error::Error;
use std::sync::{Arc, OnceLock};

///
/// Operation
///
/// Single-assignment handle to the outcome of one unit of work.
/// Starts not-done and moves exactly once to done-with-result or
/// done-with-error; reading it earlier yields [`Error::Incomplete`].
///

#[derive(Debug)]
pub struct Operation<T> {
    slot: Arc<OnceLock<Result<T, Error>>>,
}

impl<T> Operation<T> {
    /// A fresh operation and the completer that resolves it.
    pub(crate) fn pending() -> (Self, Completer<T>) {
        let slot = Arc::new(OnceLock::new());
        let completer = Completer {
            slot: Arc::clone(&slot),
        };

        (Self { slot }, completer)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Borrow the result, or a copy of the captured error.
    pub fn get(&self) -> Result<&T, Error> {
        match self.slot.get() {
            Some(Ok(value)) => Ok(value),
            Some(Err(err)) => Err(err.clone()),
            None => Err(Error::Incomplete),
        }
    }

    /// Captured error, if the operation completed with one.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.slot.get().and_then(|result| result.as_ref().err())
    }

    /// Take the outcome. An operation still owned by an unexecuted batch is
    /// reported as incomplete.
    pub fn into_result(self) -> Result<T, Error> {
        Arc::try_unwrap(self.slot)
            .map_err(|_| Error::Incomplete)?
            .into_inner()
            .unwrap_or(Err(Error::Incomplete))
    }
}

///
/// Completer
/// Write side of an [`Operation`]; consumed by completion.
///

pub(crate) struct Completer<T> {
    slot: Arc<OnceLock<Result<T, Error>>>,
}

impl<T> Completer<T> {
    pub(crate) fn complete(self, result: Result<T, Error>) {
        assert!(
            self.slot.set(result).is_ok(),
            "operation completed twice"
        );
    }
}
