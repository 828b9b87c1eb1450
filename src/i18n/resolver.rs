//! Locale-aware string resolution with a remote translation tier.
//!
//! Selecting a non-default locale starts a background request to the
//! translation service and returns immediately. Until it settles, and after
//! it fails, strings come from the embedded tables. Every selection bumps an
//! epoch; a settling request only applies its result when its epoch is still
//! current, so a slow response for an abandoned locale is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::task::JoinHandle;

use super::catalog::{LocaleCatalog, StringTable};
use super::locales::Locale;
use crate::client::TranslationService;

/// Lifecycle of the active table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverState {
    /// Default locale; the static English table is authoritative.
    Idle,
    /// Remote translation for `locale` is outstanding.
    Loading {
        /// Selected locale.
        locale: Locale,
        /// Selection this request belongs to.
        epoch: u64,
    },
    /// Remote translation applied.
    Resolved {
        /// Selected locale.
        locale: Locale,
        /// Table returned by the service.
        table: Arc<StringTable>,
    },
    /// Remote translation failed; static tables only.
    FallenBack {
        /// Selected locale.
        locale: Locale,
    },
}

impl ResolverState {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ResolverState::Idle => "idle",
            ResolverState::Loading { .. } => "loading",
            ResolverState::Resolved { .. } => "resolved",
            ResolverState::FallenBack { .. } => "fallen-back",
        }
    }
}

/// Where a resolved string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableSource {
    /// Translation service result.
    Remote,
    /// Embedded table for the selected locale.
    StaticLocale,
    /// Embedded English table.
    StaticDefault,
}

/// Ordered table tiers, consulted lazily per key.
///
/// The first tier holding a non-empty value for the key wins.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    tiers: Vec<(TableSource, Arc<StringTable>)>,
}

impl FallbackChain {
    /// Build a chain from tiers in priority order.
    pub fn new(tiers: Vec<(TableSource, Arc<StringTable>)>) -> Self {
        Self { tiers }
    }

    /// Find the winning tier for a key.
    pub fn resolve(&self, key: &str) -> Option<(TableSource, &str)> {
        self.tiers.iter().find_map(|(source, table)| {
            table.get(key).filter(|value| !value.is_empty()).map(|value| (*source, value))
        })
    }
}

/// Snapshot lookup function for the current selection.
///
/// Cheap to clone; does not observe later state changes.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: Locale,
    chain: FallbackChain,
}

impl Translator {
    /// Locale this translator was built for.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Resolve a key. Unknown keys resolve to themselves.
    pub fn get(&self, key: &str) -> String {
        match self.chain.resolve(key) {
            Some((_, value)) => value.to_string(),
            None => {
                tracing::warn!(key = key, locale = %self.locale, "Missing translation key");
                key.to_string()
            },
        }
    }

    /// Which tier answers a key.
    pub fn source_of(&self, key: &str) -> Option<TableSource> {
        self.chain.resolve(key).map(|(source, _)| source)
    }
}

#[derive(Debug)]
struct Shared {
    locale: Locale,
    epoch: u64,
    state: ResolverState,
}

/// Resolves UI strings for the selected locale.
#[derive(Clone)]
pub struct TranslationResolver {
    catalog: Arc<LocaleCatalog>,
    service: Arc<dyn TranslationService>,
    shared: Arc<Mutex<Shared>>,
}

impl TranslationResolver {
    /// Create a resolver on the default locale.
    pub fn new(catalog: Arc<LocaleCatalog>, service: Arc<dyn TranslationService>) -> Self {
        let shared = Shared { locale: Locale::DEFAULT, epoch: 0, state: ResolverState::Idle };
        Self { catalog, service, shared: Arc::new(Mutex::new(shared)) }
    }

    /// Currently selected locale.
    pub fn locale(&self) -> Locale {
        lock(&self.shared).locale
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ResolverState {
        lock(&self.shared).state.clone()
    }

    /// Select a locale.
    ///
    /// The default locale applies synchronously. Any other locale spawns a
    /// translation request on the current tokio runtime and returns its
    /// handle; awaiting it is optional. Re-selecting the locale that is
    /// already loading or resolved is a no-op and returns `None`.
    pub fn select_locale(&self, locale: Locale) -> Option<JoinHandle<()>> {
        let epoch = {
            let mut shared = lock(&self.shared);

            let unchanged = shared.locale == locale
                && matches!(
                    shared.state,
                    ResolverState::Idle
                        | ResolverState::Loading { .. }
                        | ResolverState::Resolved { .. }
                );
            if unchanged {
                return None;
            }

            shared.epoch += 1;
            shared.locale = locale;

            if locale.is_default() {
                shared.state = ResolverState::Idle;
                tracing::debug!(epoch = shared.epoch, "Default locale selected");
                return None;
            }

            shared.state = ResolverState::Loading { locale, epoch: shared.epoch };
            shared.epoch
        };

        tracing::debug!(locale = %locale, epoch, "Fetching remote translation");

        let service = Arc::clone(&self.service);
        let shared = Arc::clone(&self.shared);
        let content = self.catalog.default_table();

        Some(tokio::spawn(async move {
            let outcome = service.translate(&content, locale).await;

            let mut shared = lock(&shared);
            if shared.epoch != epoch {
                tracing::debug!(
                    locale = %locale,
                    epoch,
                    current = shared.epoch,
                    "Discarding stale translation"
                );
                return;
            }

            shared.state = match outcome {
                Ok(table) => {
                    tracing::debug!(locale = %locale, keys = table.len(), "Translation applied");
                    ResolverState::Resolved { locale, table: Arc::new(table) }
                },
                Err(e) => {
                    tracing::warn!(
                        locale = %locale,
                        error = %e,
                        "Translation unavailable, using static strings"
                    );
                    ResolverState::FallenBack { locale }
                },
            };
        }))
    }

    /// Build a lookup snapshot for the current state.
    pub fn translator(&self) -> Translator {
        let (locale, state) = {
            let shared = lock(&self.shared);
            (shared.locale, shared.state.clone())
        };

        let mut tiers = Vec::with_capacity(3);
        if let ResolverState::Resolved { table, .. } = state {
            tiers.push((TableSource::Remote, table));
        }
        if !locale.is_default() {
            tiers.push((TableSource::StaticLocale, self.catalog.lookup(locale)));
        }
        tiers.push((TableSource::StaticDefault, self.catalog.default_table()));

        Translator { locale, chain: FallbackChain::new(tiers) }
    }

    /// Resolve a single key against the current state.
    pub fn resolve_key(&self, key: &str) -> String {
        self.translator().get(key)
    }
}

impl std::fmt::Debug for TranslationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = lock(&self.shared);
        f.debug_struct("TranslationResolver")
            .field("locale", &shared.locale.code())
            .field("epoch", &shared.epoch)
            .field("state", &shared.state.label())
            .finish()
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
