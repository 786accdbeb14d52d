use std::collections::HashMap;

/// Plural form selection for a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// One form for every count (ja, zh, ko, ...)
    Single,
    /// 0 and 1 are singular (fr, pt_BR)
    ZeroOneSingular,
    /// n%10 == 1 singular, n%10 in 2..=4 paucal (ru, uk, ...)
    Slavic,
    /// 1 singular, 2..=4 paucal by last digit (pl)
    Polish,
    /// 1 singular, 2..=4 paucal (cs, sk)
    Czech,
    /// 1 singular, everything else plural
    Germanic,
}

impl PluralRule {
    pub fn for_locale(locale: &str) -> Self {
        let lang = locale.split(['-', '_']).next().unwrap_or(locale);
        match lang {
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" => PluralRule::Single,
            "fr" => PluralRule::ZeroOneSingular,
            "pt" if locale.len() > 2 && locale[3..].eq_ignore_ascii_case("br") => {
                PluralRule::ZeroOneSingular
            }
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => PluralRule::Slavic,
            "pl" => PluralRule::Polish,
            "cs" | "sk" => PluralRule::Czech,
            _ => PluralRule::Germanic,
        }
    }

    /// Index into the `msgstr[n]` forms
    pub fn form_index(&self, n: u64) -> usize {
        let n10 = n % 10;
        let n100 = n % 100;
        let paucal = (2..=4).contains(&n10) && !(12..=14).contains(&n100);
        match self {
            PluralRule::Single => 0,
            PluralRule::ZeroOneSingular => usize::from(n > 1),
            PluralRule::Slavic if n10 == 1 && n100 != 11 => 0,
            PluralRule::Slavic if paucal => 1,
            PluralRule::Slavic => 2,
            PluralRule::Polish if n == 1 => 0,
            PluralRule::Polish if paucal => 1,
            PluralRule::Polish => 2,
            PluralRule::Czech if n == 1 => 0,
            PluralRule::Czech if (2..=4).contains(&n) => 1,
            PluralRule::Czech => 2,
            PluralRule::Germanic => usize::from(n != 1),
        }
    }
}

/// Translations of one locale
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locale: String,
    rule: PluralRule,
    messages: HashMap<String, String>,
    plurals: HashMap<String, Vec<String>>,
}

impl MessageCatalog {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            rule: PluralRule::for_locale(locale),
            messages: HashMap::new(),
            plurals: HashMap::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.rule
    }

    pub fn len(&self) -> usize {
        self.messages.len() + self.plurals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_translation(&mut self, message: impl Into<String>, translation: impl Into<String>) {
        self.messages.insert(message.into(), translation.into());
    }

    /// Forms are indexed by [`PluralRule::form_index`]
    pub fn add_plural(&mut self, singular: impl Into<String>, forms: Vec<String>) {
        self.plurals.insert(singular.into(), forms);
    }

    /// Untranslated (empty) entries count as missing
    pub fn get(&self, message: &str) -> Option<&str> {
        self.messages
            .get(message)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn get_plural(&self, singular: &str, n: u64) -> Option<&str> {
        let forms = self.plurals.get(singular)?;
        forms
            .get(self.rule.form_index(n))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}
