// src/models/known_stores.rs
// DOCUMENTATION: Curated store-name → keyword dictionary
// PURPOSE: Quick-select list for the UI and keyword source for place-name matching

use serde::Serialize;

/// Built-in chains and the lowercase keywords that show up in their address data
const BUILTIN_STORES: &[(&str, &[&str])] = &[
    ("Lidl", &["lidl"]),
    ("Tesco", &["tesco"]),
    ("Sainsbury's", &["sainsbury"]),
    ("Asda", &["asda"]),
    ("Morrisons", &["morrisons"]),
    ("Aldi", &["aldi"]),
    ("Waitrose", &["waitrose"]),
    ("Co-op", &["co-op", "coop"]),
    ("M&S", &["marks", "spencer", "m&s"]),
    ("Iceland", &["iceland"]),
    ("Boots", &["boots"]),
    ("Superdrug", &["superdrug"]),
    ("Holland & Barrett", &["holland", "barrett"]),
    ("Costa", &["costa"]),
    ("Starbucks", &["starbucks"]),
    ("Nando's", &["nandos", "nando"]),
    ("Greggs", &["greggs"]),
    ("Subway", &["subway"]),
    ("McDonald's", &["mcdonald", "mcdonalds"]),
    ("KFC", &["kfc"]),
];

/// One dictionary entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnownStore {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Immutable store dictionary
/// DOCUMENTATION: Built once at startup and shared read-only (web::Data);
/// matchers borrow it instead of reaching for a global
#[derive(Debug, Clone, PartialEq)]
pub struct KnownStoreDictionary {
    stores: Vec<KnownStore>,
}

impl Default for KnownStoreDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnownStoreDictionary {
    /// Dictionary with the built-in chains
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_STORES.iter().map(|(name, keywords)| {
            (name.to_string(), keywords.iter().map(|k| k.to_string()).collect())
        }))
    }

    /// Dictionary from arbitrary entries; keywords are lowercased, order is preserved
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let stores = entries
            .into_iter()
            .map(|(name, keywords)| KnownStore {
                name,
                keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();

        Self { stores }
    }

    /// Keywords for an exact (case-sensitive) store name
    pub fn keywords(&self, store_name: &str) -> Option<&[String]> {
        self.stores
            .iter()
            .find(|store| store.name == store_name)
            .map(|store| store.keywords.as_slice())
    }

    /// Store names in dictionary order
    pub fn store_names(&self) -> impl Iterator<Item = &str> {
        self.stores.iter().map(|store| store.name.as_str())
    }

    pub fn entries(&self) -> &[KnownStore] {
        &self.stores
    }

    /// Guess the chain from a free-text address
    /// DOCUMENTATION: Returns the first entry (dictionary order) with a keyword contained
    /// in the lowercased address
    pub fn detect_store_from_address(&self, address: &str) -> Option<&str> {
        let lower = address.to_lowercase();

        self.stores
            .iter()
            .find(|store| store.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|store| store.name.as_str())
    }
}
