use crate::handle::ListHandle;
use crate::source::RecordSource;

/// Fills a list once after it is activated.
///
/// A loader is expected to call [`ListHandle::replace_all`] at most once, at
/// any later time. If it never does, the list simply stays in `Loading`.
pub trait AsyncLoader<R> {
    fn load(self, list: ListHandle<R>);
}

impl<R, F> AsyncLoader<R> for F
where
    F: FnOnce(ListHandle<R>),
{
    fn load(self, list: ListHandle<R>) {
        self(list)
    }
}

/// Loader that fetches from a [`RecordSource`] on a background tokio task
#[derive(Debug)]
pub struct SourceLoader<S> {
    source: S,
}

impl<S: RecordSource> SourceLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: RecordSource> AsyncLoader<S::Record> for SourceLoader<S> {
    fn load(self, list: ListHandle<S::Record>) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("Cannot start record loading without a tokio runtime: {}", e);
                return;
            }
        };

        log::debug!("Starting background record loading");

        let source = self.source;
        runtime.spawn(async move {
            match source.fetch().await {
                Ok(records) => {
                    log::debug!("Background loading fetched {} records", records.len());
                    list.replace_all(Some(records));
                }
                Err(e) => {
                    log::warn!("Background loading failed: {}", e);
                }
            }
        });
    }
}
