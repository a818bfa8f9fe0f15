use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::catalog::{letters_only, CanonicalRef, Entry, ModCatalog, ModKind, Target};
use crate::normalize::TextNormalizer;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModMatch {
    pub kind: ModKind,
    pub canonical: CanonicalRef,
}

impl ModMatch {
    pub fn is_beneficial(&self) -> bool {
        self.kind.is_beneficial()
    }
}

/// Linear scan over the catalog; the catalog is tens of entries.
#[derive(Debug, Clone)]
pub struct ModMatcher {
    catalog: Arc<ModCatalog>,
}

impl ModMatcher {
    pub fn new(catalog: Arc<ModCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ModCatalog {
        &self.catalog
    }

    /// Matches one cleaned line against the catalog under the panel's directional context.
    ///
    /// Both sides are compared on lowercase letters only. The first beneficial, then harmful,
    /// descriptor whose key and target both agree wins.
    pub fn match_mod(&self, cleaned: &str, context: &str) -> Option<ModMatch> {
        let candidate = letters_only(cleaned);
        if candidate.is_empty() {
            return None;
        }
        let target = Target::resolve(context)?;

        let scan = |entries: &[Entry], kind: ModKind| {
            entries
                .iter()
                .find(|e| e.descriptor.target == target && e.key == candidate)
                .map(|e| ModMatch {
                    kind,
                    canonical: e.descriptor.canonical(),
                })
        };

        scan(self.catalog.beneficial.as_slice(), ModKind::Beneficial)
            .or_else(|| scan(self.catalog.harmful.as_slice(), ModKind::Harmful))
    }
}

/// Persisted form of one matcher cache entry. `value` may be a bare id in caches written before
/// references were qualified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub text: String,
    pub context: String,
    pub matched: bool,
    #[serde(default)]
    pub beneficial: bool,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone)]
enum Cached {
    Hit { kind: ModKind, value: String },
    Miss,
}

/// [`ModMatcher`] behind a normalizer and a memo keyed on the raw `(text, context)` pair.
#[derive(Debug)]
pub struct CachedMatcher {
    matcher: ModMatcher,
    normalizer: Arc<TextNormalizer>,
    entries: Mutex<HashMap<(String, String), Cached>>,
}

impl CachedMatcher {
    pub fn new(matcher: ModMatcher, normalizer: Arc<TextNormalizer>) -> Self {
        Self {
            matcher,
            normalizer,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn matcher(&self) -> &ModMatcher {
        &self.matcher
    }

    pub fn match_raw(&self, raw: &str, context: &str) -> Option<ModMatch> {
        let key = (raw.to_string(), context.to_string());
        {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get_mut(&key) {
                if migrate(entry, context) {
                    return to_match(entry);
                }
                entries.remove(&key);
            }
        }

        let cleaned = self.normalizer.clean(raw);
        let cleaned_context = self.normalizer.clean(context);
        let result = self.matcher.match_mod(&cleaned, &cleaned_context);
        let entry = match &result {
            Some(m) => Cached::Hit {
                kind: m.kind,
                value: m.canonical.to_string(),
            },
            None => Cached::Miss,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
        result
    }

    /// Loads previously persisted entries as-is. Unqualified values are fixed up by
    /// [`CachedMatcher::migrate_all`] or lazily on first read.
    pub fn import(&self, records: impl IntoIterator<Item = CacheRecord>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for r in records {
            let entry = if r.matched {
                Cached::Hit {
                    kind: if r.beneficial {
                        ModKind::Beneficial
                    } else {
                        ModKind::Harmful
                    },
                    value: r.value,
                }
            } else {
                Cached::Miss
            };
            entries.insert((r.text, r.context), entry);
        }
    }

    pub fn export(&self) -> Vec<CacheRecord> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<CacheRecord> = entries
            .iter()
            .map(|((text, context), entry)| match entry {
                Cached::Hit { kind, value } => CacheRecord {
                    text: text.clone(),
                    context: context.clone(),
                    matched: true,
                    beneficial: kind.is_beneficial(),
                    value: value.clone(),
                },
                Cached::Miss => CacheRecord {
                    text: text.clone(),
                    context: context.clone(),
                    matched: false,
                    beneficial: false,
                    value: String::new(),
                },
            })
            .collect();
        records.sort_by(|a, b| (&a.text, &a.context).cmp(&(&b.text, &b.context)));
        records
    }

    /// Qualifies every legacy entry in place. Entries whose context no longer resolves to a
    /// target are dropped so they get recomputed. Returns how many entries were rewritten.
    pub fn migrate_all(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rewritten = 0;
        entries.retain(|(_, context), entry| {
            let legacy = matches!(entry, Cached::Hit { value, .. } if !CanonicalRef::is_qualified(value));
            let keep = migrate(entry, context);
            if legacy && keep {
                rewritten += 1;
            }
            keep
        });
        rewritten
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rewrites a bare cached id to `Target|id` using the entry's context. Returns false when the
/// entry cannot be qualified and must be discarded.
fn migrate(entry: &mut Cached, context: &str) -> bool {
    let Cached::Hit { value, .. } = entry else {
        return true;
    };
    if CanonicalRef::is_qualified(value) {
        return true;
    }
    let Some(target) = Target::resolve(context) else {
        tracing::debug!(value = %value, context, "dropping unqualifiable matcher cache entry");
        return false;
    };
    let id = value.rsplit('|').next().unwrap_or_default().to_string();
    if id.is_empty() {
        return false;
    }
    tracing::trace!(%target, id = %id, "qualified legacy matcher cache entry");
    *value = CanonicalRef::new(target, &id).to_string();
    true
}

fn to_match(entry: &Cached) -> Option<ModMatch> {
    match entry {
        Cached::Hit { kind, value } => CanonicalRef::parse(value).map(|canonical| ModMatch {
            kind: *kind,
            canonical,
        }),
        Cached::Miss => None,
    }
}
