//! Static modifier descriptors and the canonical `Target|id` reference.

use core::fmt;
use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Who a panel's harmful modifiers apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Target {
    Player,
    Boss,
    Minion,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Player, Target::Boss, Target::Minion];

    pub fn name(self) -> &'static str {
        match self {
            Target::Player => "Player",
            Target::Boss => "Boss",
            Target::Minion => "Minion",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Resolves a panel header ("Eldritch Minions gain:", "Map boss gains:", ...) by token
    /// containment over its lowercase letters.
    pub fn resolve(context: &str) -> Option<Self> {
        let letters = letters_only(context);
        if letters.contains("minion") {
            Some(Target::Minion)
        } else if letters.contains("boss") {
            Some(Target::Boss)
        } else if letters.contains("player") {
            Some(Target::Player)
        } else {
            None
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase alphabetic characters only; digits, punctuation, and whitespace are dropped.
pub fn letters_only(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModKind {
    Beneficial,
    Harmful,
}

impl ModKind {
    pub fn is_beneficial(self) -> bool {
        matches!(self, ModKind::Beneficial)
    }
}

/// Fully qualified `Target|id` reference to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRef(String);

impl CanonicalRef {
    pub fn new(target: Target, id: &str) -> Self {
        Self(format!("{}|{}", target.name(), id))
    }

    /// Accepts only qualified strings whose prefix names a known target.
    pub fn parse(value: &str) -> Option<Self> {
        let (target, id) = value.split_once('|')?;
        let target = Target::from_name(target)?;
        if id.is_empty() {
            return None;
        }
        Some(Self::new(target, id))
    }

    /// Whether a stored reference already carries a `Target|` prefix.
    pub fn is_qualified(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    pub fn target(&self) -> Target {
        self.0
            .split_once('|')
            .and_then(|(t, _)| Target::from_name(t))
            .unwrap_or(Target::Player)
    }

    pub fn id(&self) -> &str {
        self.0.split_once('|').map_or(self.0.as_str(), |(_, id)| id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierDescriptor {
    /// Canonical modifier text; `#` stands in for rolled numbers.
    pub id: String,
    #[serde(default)]
    pub display_text: String,
    pub target: Target,
    #[serde(default = "default_tier")]
    pub default_tier: i32,
}

fn default_tier() -> i32 {
    1
}

impl ModifierDescriptor {
    pub fn new(id: &str, target: Target, default_tier: i32) -> Self {
        Self {
            id: id.to_string(),
            display_text: id.to_string(),
            target,
            default_tier,
        }
    }

    pub fn canonical(&self) -> CanonicalRef {
        CanonicalRef::new(self.target, &self.id)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) descriptor: ModifierDescriptor,
    pub(crate) key: String,
}

impl Entry {
    fn new(descriptor: ModifierDescriptor) -> Self {
        let key = letters_only(&descriptor.id);
        Self { descriptor, key }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    beneficial: Vec<ModifierDescriptor>,
    #[serde(default)]
    harmful: Vec<ModifierDescriptor>,
}

/// Two disjoint descriptor lists, scanned beneficial first.
#[derive(Debug, Clone, Default)]
pub struct ModCatalog {
    pub(crate) beneficial: Vec<Entry>,
    pub(crate) harmful: Vec<Entry>,
}

impl ModCatalog {
    /// Rejects empty ids and any (target, letters-only id) pair that appears twice, within one
    /// list or across both.
    pub fn new(
        beneficial: Vec<ModifierDescriptor>,
        harmful: Vec<ModifierDescriptor>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for (kind, d) in beneficial
            .iter()
            .map(|d| ("beneficial", d))
            .chain(harmful.iter().map(|d| ("harmful", d)))
        {
            let key = letters_only(&d.id);
            if key.is_empty() {
                bail!("{kind} modifier {:?} has no letters to match on", d.id);
            }
            if !seen.insert((d.target, key)) {
                bail!("duplicate modifier {:?} for target {}", d.id, d.target);
            }
        }

        Ok(Self {
            beneficial: beneficial.into_iter().map(Entry::new).collect(),
            harmful: harmful.into_iter().map(Entry::new).collect(),
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml).context("Failed to parse catalog")?;
        Self::new(file.beneficial, file.harmful)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.beneficial.len() + self.harmful.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every descriptor in scan order, tagged with its kind.
    pub fn descriptors(&self) -> impl Iterator<Item = (ModKind, &ModifierDescriptor)> {
        self.beneficial
            .iter()
            .map(|e| (ModKind::Beneficial, &e.descriptor))
            .chain(self.harmful.iter().map(|e| (ModKind::Harmful, &e.descriptor)))
    }

    /// A small representative catalog for the harness and tests.
    pub fn builtin() -> Self {
        use Target::*;

        let beneficial = [
            ("Final Boss drops # additional Divine Orbs", Boss, 100),
            ("Final Boss drops # additional Exalted Orbs", Boss, 30),
            ("Final Boss drops # additional Chaos Orbs", Boss, 10),
            ("#% increased Quantity of Items dropped by Final Boss", Boss, 20),
            ("Drops # additional Divine Orbs", Minion, 60),
            ("#% chance to drop an additional Divine Orb", Minion, 40),
            ("Drops # additional Scarabs", Minion, 8),
            ("#% increased Quantity of Items found in this Area", Player, 12),
            ("#% chance to drop an additional Divine Orb", Player, 50),
            ("Items dropped by Monsters have #% chance to be Duplicated", Player, 45),
            ("#% increased Experience gain", Player, 4),
        ];
        let harmful = [
            ("#% increased Damage", Boss, 20),
            ("Hits have #% chance to ignore Enemy Physical Damage Reduction", Boss, 15),
            ("Cannot be Stunned", Boss, 2),
            ("#% increased Damage", Minion, 15),
            ("#% increased Movement Speed", Minion, 5),
            ("Gain #% of Physical Damage as Extra Chaos Damage", Minion, 25),
            ("#% reduced Recovery Rate of Life and Energy Shield", Player, 40),
            ("Cannot Regenerate Life, Mana or Energy Shield", Player, 95),
            ("#% reduced Defences", Player, 30),
        ];

        Self {
            beneficial: entries(&beneficial),
            harmful: entries(&harmful),
        }
    }
}

fn entries(rows: &[(&str, Target, i32)]) -> Vec<Entry> {
    rows.iter()
        .map(|&(id, target, tier)| Entry::new(ModifierDescriptor::new(id, target, tier)))
        .collect()
}
