//! Scoped archive lifecycle: acquire, run, guaranteed release.

use crate::error::{Error, Result};
use crate::node::Archive;

/// Run `op` against the archive's root folder, then close the archive
/// regardless of the outcome.
///
/// Exactly one terminal status is returned: the operation's success,
/// or the first error encountered. A close failure is never swallowed
/// — after a successful operation it becomes the result, and after a
/// failed one it is appended to the primary error
/// ([`Error::CloseAfter`]).
///
/// The archive is consumed, so node handles produced inside `op`
/// cannot outlive the open scope through the session. Backends also
/// release the underlying file on drop, which covers an unwind out of
/// `op`.
pub fn with_archive<A, T>(archive: A, op: impl FnOnce(A::Folder) -> Result<T>) -> Result<T>
where
    A: Archive,
{
    let outcome = archive.root_folder().and_then(op);
    match (outcome, archive.close()) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close)) => Err(close),
        (Err(primary), Ok(())) => Err(primary),
        (Err(primary), Err(close)) => Err(Error::CloseAfter {
            primary: Box::new(primary),
            close: Box::new(close),
        }),
    }
}
