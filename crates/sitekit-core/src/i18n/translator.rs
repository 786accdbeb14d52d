use super::catalog::MessageCatalog;
use super::po_parser::parse_po;
use crate::error::I18nError;
use crate::storage::config::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Looks messages up in an optional catalog
///
/// Without a catalog every message translates to itself.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    catalog: Option<MessageCatalog>,
}

/// `<locale_dir>/<locale>/LC_MESSAGES/messages.po`
pub fn catalog_path(locale_dir: &Path, locale: &str) -> PathBuf {
    locale_dir
        .join(locale)
        .join("LC_MESSAGES")
        .join("messages.po")
}

impl Translator {
    pub fn new(catalog: MessageCatalog) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    pub fn load(locale_dir: &Path, locale: &str) -> Result<Self, I18nError> {
        let path = catalog_path(locale_dir, locale);
        let content = fs::read_to_string(&path).map_err(|source| I18nError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(parse_po(&content, locale)?))
    }

    /// Catalog from `[site].locale_dir` and the configured locale
    ///
    /// Falls back to the identity translator when either is unset or the
    /// catalog cannot be read.
    pub fn from_config(config: &Config) -> Self {
        let (Some(dir), Some(locale)) = (config.site.locale_dir.as_deref(), config.get_locale())
        else {
            return Self::default();
        };
        match Self::load(dir, &locale) {
            Ok(translator) => translator,
            Err(e) => {
                log::warn!("Translations for '{}' unavailable: {}", locale, e);
                Self::default()
            }
        }
    }

    pub fn locale(&self) -> Option<&str> {
        self.catalog.as_ref().map(MessageCatalog::locale)
    }

    /// Replace `%0%`, `%1%`, ... with `args` in order, then translate
    pub fn tr(&self, token: &str, args: &[&str]) -> String {
        let token = args
            .iter()
            .enumerate()
            .fold(token.to_string(), |acc, (i, arg)| {
                acc.replace(&format!("%{}%", i), arg)
            });

        self.catalog
            .as_ref()
            .and_then(|c| c.get(&token))
            .map(str::to_string)
            .unwrap_or(token)
    }

    /// Plural form of a message after `%n%` substitution
    pub fn nt(&self, singular: &str, plural: &str, n: u64) -> String {
        let count = n.to_string();
        let singular = singular.replace("%n%", &count);

        if let Some(found) = self
            .catalog
            .as_ref()
            .and_then(|c| c.get_plural(&singular, n))
        {
            return found.to_string();
        }

        if n == 1 {
            singular
        } else {
            plural.replace("%n%", &count)
        }
    }
}
