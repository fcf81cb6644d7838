use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// Attaches the file being read to an error.
#[derive(Debug, Clone)]
pub struct WithPath<Err> {
    path: PathBuf,
    inner: Err,
}

impl<E> WithPath<E> {
    pub fn context<T>(
        path: impl AsRef<Path>,
        f: impl FnOnce(&Path) -> Result<T, E>,
    ) -> Result<T, WithPath<E>> {
        let path = path.as_ref();
        f(path).map_err(|inner| WithPath {
            path: path.to_owned(),
            inner,
        })
    }
}

impl<E: fmt::Display> fmt::Display for WithPath<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (reading {})", &self.inner, self.path.display())
    }
}

impl<I: Error + 'static> Error for WithPath<I> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}
