//! Debounced search-as-you-type

use std::{future::Future, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::models::Book;

use super::{ClientResult, LibraryClient};

/// Delay between the last keystroke and the search request
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Runs only the last task scheduled within `delay` of each other.
///
/// Scheduling a task aborts the pending one, whether it is still waiting or
/// already running. Dropping the debouncer aborts the pending task.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Abort the pending task and run `task` without waiting
    pub fn run_now<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(task));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a scheduled task has not finished yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Search box that queries the catalog once typing pauses
pub struct SearchBox {
    client: LibraryClient,
    debouncer: Debouncer,
    results: mpsc::UnboundedSender<ClientResult<Vec<Book>>>,
}

impl SearchBox {
    /// Search box waiting [`DEFAULT_SEARCH_DELAY`] after the last input.
    /// Returns the search box and the receiver its results arrive on.
    pub fn new(client: LibraryClient) -> (Self, mpsc::UnboundedReceiver<ClientResult<Vec<Book>>>) {
        Self::with_delay(client, DEFAULT_SEARCH_DELAY)
    }

    pub fn with_delay(
        client: LibraryClient,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ClientResult<Vec<Book>>>) {
        let (results, receiver) = mpsc::unbounded_channel();
        let search_box = Self {
            client,
            debouncer: Debouncer::new(delay),
            results,
        };
        (search_box, receiver)
    }

    /// Record the current contents of the search field
    pub fn input(&mut self, query: impl Into<String>) {
        let search = self.search(query.into());
        self.debouncer.schedule(search);
    }

    /// Run a search right away, dropping any pending one
    pub fn submit(&mut self, query: impl Into<String>) {
        let search = self.search(query.into());
        self.debouncer.run_now(search);
    }

    fn search(&self, query: String) -> impl Future<Output = ()> + Send + 'static {
        let client = self.client.clone();
        let results = self.results.clone();
        async move {
            let outcome = client.search_books(&query).await;
            // Receiver gone means nobody is listening any more
            let _ = results.send(outcome);
        }
    }
}
