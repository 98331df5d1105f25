//! Ingest and resolution settings.
//!
//! Settings are plain values with builder-style `with_*` helpers. Nothing is
//! read from the environment or from files.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Periodic progress callback for long traversals.
///
/// The callback receives the running count of processed entities every
/// `every` entities. Hosts use it to report progress or to check for
/// cancellation requests between batches.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use ringstitch_core::ProgressHook;
///
/// let seen = Arc::new(AtomicU64::new(0));
/// let sink = Arc::clone(&seen);
/// let hook = ProgressHook::new(2, move |count| sink.store(count, Ordering::Relaxed));
/// for count in 1..=5 {
///     hook.tick(count);
/// }
/// assert_eq!(seen.load(Ordering::Relaxed), 4);
/// ```
#[derive(Clone)]
pub struct ProgressHook {
    every: u64,
    callback: Arc<dyn Fn(u64) + Send + Sync>,
}

impl ProgressHook {
    /// Invoke `callback` every `every` entities. An interval of zero is
    /// treated as one.
    pub fn new(every: u64, callback: impl Fn(u64) + Send + Sync + 'static) -> Self {
        Self {
            every: every.max(1),
            callback: Arc::new(callback),
        }
    }

    /// Report `count` processed entities, firing on interval boundaries.
    pub fn tick(&self, count: u64) {
        if count > 0 && count.is_multiple_of(self.every) {
            (self.callback)(count);
        }
    }

    /// Interval between callback invocations.
    pub const fn interval(&self) -> u64 {
        self.every
    }
}

impl fmt::Debug for ProgressHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressHook")
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}

/// Shared counter that drives a [`ProgressHook`] from several workers.
#[derive(Debug)]
pub(crate) struct ProgressCounter<'a> {
    hook: Option<&'a ProgressHook>,
    count: AtomicU64,
}

impl<'a> ProgressCounter<'a> {
    pub(crate) const fn new(hook: Option<&'a ProgressHook>) -> Self {
        Self {
            hook,
            count: AtomicU64::new(0),
        }
    }

    pub(crate) fn advance(&self) {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(hook) = self.hook {
            hook.tick(count);
        }
    }
}

/// How a tag value that appears before its key is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagOrder {
    /// Drop the orphaned value and carry on.
    #[default]
    Lenient,
    /// Reject the document.
    Strict,
}

/// What happens when an entity's tag keys and values do not pair up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParityPolicy {
    /// Abort the whole document.
    #[default]
    Fail,
    /// Drop the offending entity, log it and continue.
    SkipEntity,
}

/// Settings for building an entity store from an OSM document.
///
/// # Examples
/// ```
/// use ringstitch_core::{IngestConfig, ParityPolicy};
///
/// let config = IngestConfig::default()
///     .with_reserved_tag_extraction(false)
///     .with_parity_policy(ParityPolicy::SkipEntity);
/// assert!(!config.extract_reserved_tags);
/// assert!(config.progress.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Remove `name`, `highway` and `oneway` from way tags once they have
    /// been copied into the dedicated way fields.
    pub extract_reserved_tags: bool,
    /// Treatment of values preceding their keys.
    pub tag_order: TagOrder,
    /// Treatment of unbalanced key/value counts.
    pub parity: ParityPolicy,
    /// Run the counting pre-pass and reserve store capacity.
    pub presize: bool,
    /// Optional progress reporting during the build walk.
    pub progress: Option<ProgressHook>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extract_reserved_tags: true,
            tag_order: TagOrder::default(),
            parity: ParityPolicy::default(),
            presize: false,
            progress: None,
        }
    }
}

impl IngestConfig {
    /// Toggle extraction of reserved way tags.
    #[must_use]
    pub fn with_reserved_tag_extraction(mut self, extract: bool) -> Self {
        self.extract_reserved_tags = extract;
        self
    }

    /// Select the tag ordering policy.
    #[must_use]
    pub fn with_tag_order(mut self, order: TagOrder) -> Self {
        self.tag_order = order;
        self
    }

    /// Select the tag parity policy.
    #[must_use]
    pub fn with_parity_policy(mut self, parity: ParityPolicy) -> Self {
        self.parity = parity;
        self
    }

    /// Enable or disable the counting pre-pass.
    #[must_use]
    pub fn with_presize(mut self, presize: bool) -> Self {
        self.presize = presize;
        self
    }

    /// Attach a progress hook.
    #[must_use]
    pub fn with_progress(mut self, hook: ProgressHook) -> Self {
        self.progress = Some(hook);
        self
    }
}
