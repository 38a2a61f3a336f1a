//! Atomic publication of rebuilt indices and coalescing of rebuild requests
use super::builder::IndexBuilder;
use super::WordIndex;
use crate::error::CompletionResult;
use crate::reject::RejectList;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Holds the live index. Readers clone an `Arc` snapshot; writers swap the pointer.
#[derive(Debug, Default)]
pub struct IndexStore {
    current: RwLock<Arc<WordIndex>>,
    generation: AtomicU64,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(index: WordIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            generation: AtomicU64::new(1),
        }
    }

    /// The complete index visible right now
    pub fn snapshot(&self) -> Arc<WordIndex> {
        self.current.read().clone()
    }

    /// Replace the live index in one step and return the new generation
    pub fn publish(&self, index: WordIndex) -> u64 {
        let fresh = Arc::new(index);
        *self.current.write() = fresh;
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of publishes so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// What a rebuild request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A new index was published
    Published { generation: u64, words: usize },
    /// Another rebuild was already running; it will run once more to pick this request up
    Coalesced,
}

#[derive(Debug, Default)]
struct RebuildState {
    running: bool,
    pending: bool,
}

/// Owned by the rebuild that set `running`. If that rebuild never reaches its normal
/// exit, because its future was dropped or the builder panicked, dropping the guard
/// clears the state so later requests are not coalesced into a job that is gone.
struct RunningGuard<'a> {
    state: &'a Mutex<RebuildState>,
    armed: bool,
}

impl RunningGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock();
            state.running = false;
            state.pending = false;
        }
    }
}

/// Runs an [`IndexBuilder`] and publishes its output into an [`IndexStore`].
///
/// At most one build runs at a time. Requests that arrive meanwhile are folded into a
/// single extra pass of the running job.
///
/// ```
/// use scribe_completion::{IndexRebuilder, IndexStore, RejectList, StaticDocumentSource};
/// use scribe_completion::{CharacterClass, ContentIndexBuilder, RebuildOutcome};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let source = Arc::new(StaticDocumentSource::single("note.md", "quiet quarry"));
/// let builder = ContentIndexBuilder::new(source, CharacterClass::new("a-z").unwrap(), 2);
/// let store = Arc::new(IndexStore::new());
/// let rebuilder = IndexRebuilder::new(store.clone(), Arc::new(builder), Arc::new(RejectList::new()));
///
/// let outcome = rebuilder.rebuild().await.unwrap();
/// assert_eq!(outcome, RebuildOutcome::Published { generation: 1, words: 2 });
/// assert_eq!(store.snapshot().lookup('q'), ["quiet", "quarry"]);
/// # });
/// ```
pub struct IndexRebuilder {
    store: Arc<IndexStore>,
    builder: Arc<dyn IndexBuilder>,
    reject: Arc<RejectList>,
    state: Mutex<RebuildState>,
}

impl IndexRebuilder {
    pub fn new(store: Arc<IndexStore>, builder: Arc<dyn IndexBuilder>, reject: Arc<RejectList>) -> Self {
        Self {
            store,
            builder,
            reject,
            state: Mutex::new(RebuildState::default()),
        }
    }

    pub fn store(&self) -> &Arc<IndexStore> {
        &self.store
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Build and publish. On failure the previous index stays live.
    pub async fn rebuild(&self) -> CompletionResult<RebuildOutcome> {
        {
            let mut state = self.state.lock();
            if state.running {
                state.pending = true;
                debug!("Rebuild of {} already running, coalescing", self.builder.name());
                return Ok(RebuildOutcome::Coalesced);
            }
            state.running = true;
        }
        let guard = RunningGuard {
            state: &self.state,
            armed: true,
        };

        loop {
            let index = self.builder.build(&self.reject).await?;

            let words = index.word_count();
            let generation = self.store.publish(index);
            info!(
                "Published {} index generation {} ({} words)",
                self.builder.name(),
                generation,
                words
            );

            let run_again = {
                let mut state = self.state.lock();
                if state.pending {
                    state.pending = false;
                    true
                } else {
                    state.running = false;
                    false
                }
            };
            if !run_again {
                guard.disarm();
                return Ok(RebuildOutcome::Published { generation, words });
            }
        }
    }

    /// Fire-and-forget rebuild on the tokio runtime
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.rebuild().await {
                warn!("Rebuild of {} failed: {}", this.builder.name(), e);
            }
        })
    }
}
