//! Internationalization (i18n) support for the AILingo CLI.
//!
//! Static tables are Project Fluent resources embedded in the binary
//! ([`LocaleCatalog`]). A [`TranslationResolver`] layers a remote
//! translation over them for the selected locale and hands out
//! [`Translator`] snapshots for lookups.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ailingo_cli::i18n::{keys, Locale, LocaleCatalog, TranslationResolver};
//!
//! let resolver = TranslationResolver::new(Arc::new(LocaleCatalog::embedded()), service);
//! resolver.select_locale(Locale::Fr); // returns immediately
//! let title = resolver.resolve_key(keys::TITLE);
//! ```

mod catalog;
mod locales;
mod resolver;

pub use catalog::{keys, LocaleCatalog, StringTable};
pub use locales::{detect_locale, normalize_locale, resolve_locale, Locale, SUPPORTED_LOCALES};
pub use resolver::{FallbackChain, ResolverState, TableSource, TranslationResolver, Translator};
