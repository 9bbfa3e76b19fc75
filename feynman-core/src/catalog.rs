//! Built-in catalog of SRSD Feynman benchmark tiers.
//!
//! Each tier maps to one remote dataset repository whose partitions hold the
//! rows of every equation in the tier back to back. The order of the
//! equation identifiers below is the order of the rows in the remote data,
//! so it must never be sorted or deduplicated.

use std::{fmt, str::FromStr};

use crate::{error::CatalogError, partition::Partition, partition::PartitionSizes};

/// Difficulty tier of the Feynman benchmark.
///
/// # Examples
/// ```
/// use feynman_core::Tier;
///
/// let tier: Tier = "Medium".parse().expect("tier names are case-insensitive");
/// assert_eq!(tier, Tier::Medium);
/// assert_eq!(tier.as_str(), "medium");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Equations with few variables and simple structure.
    Easy,
    /// Intermediate equations.
    Medium,
    /// Equations with many variables or deep structure.
    Hard,
}

impl Tier {
    /// Every tier in export order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Returns the lowercase tier name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(CatalogError::UnknownTier {
                name: raw.to_owned(),
            }),
        }
    }
}

/// Static description of one tier: where its data lives and how it is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierSpec {
    tier: Tier,
    repository: &'static str,
    equations: &'static [&'static str],
    sizes: PartitionSizes,
}

impl TierSpec {
    /// Describes a tier stored in `repository` with `equations` in row order.
    #[must_use]
    pub const fn new(
        tier: Tier,
        repository: &'static str,
        equations: &'static [&'static str],
        sizes: PartitionSizes,
    ) -> Self {
        Self {
            tier,
            repository,
            equations,
            sizes,
        }
    }

    /// Returns the tier this entry describes.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Returns the remote dataset repository path.
    #[must_use]
    pub const fn repository(&self) -> &'static str {
        self.repository
    }

    /// Returns the equation identifiers in remote row order.
    #[must_use]
    pub const fn equations(&self) -> &'static [&'static str] {
        self.equations
    }

    /// Returns the number of equations in the tier.
    #[must_use]
    pub const fn equation_count(&self) -> usize {
        self.equations.len()
    }

    /// Returns the per-equation row counts.
    #[must_use]
    pub const fn sizes(&self) -> PartitionSizes {
        self.sizes
    }

    /// Returns how many rows `partition` must hold for every equation of the
    /// tier, or `None` if the product overflows.
    ///
    /// # Examples
    /// ```
    /// use feynman_core::{Catalog, Partition, Tier};
    ///
    /// let catalog = Catalog::feynman();
    /// let easy = catalog.spec(Tier::Easy).expect("easy tier is built in");
    /// assert_eq!(easy.required_rows(Partition::Train), Some(30 * 8_000));
    /// ```
    #[must_use]
    pub const fn required_rows(&self, partition: Partition) -> Option<usize> {
        self.equations.len().checked_mul(self.sizes.get(partition))
    }
}

const EASY_EQUATIONS: &[&str] = &[
    "I.12.1",
    "I.12.4",
    "I.12.5",
    "I.14.3",
    "I.14.4",
    "I.18.12",
    "I.18.16",
    "I.25.13",
    "I.26.2",
    "I.27.6",
    "I.30.5",
    "I.43.16",
    "I.47.23",
    "II.2.42",
    "II.3.24",
    "II.4.23",
    "II.8.31",
    "II.10.9",
    "II.13.17",
    "II.15.4",
    "II.15.5",
    "II.27.16",
    "II.27.18",
    "II.34.11",
    "II.34.29b",
    "II.38.3",
    "II.38.14",
    "III.7.38",
    "III.12.43",
    "III.15.27",
];

const MEDIUM_EQUATIONS: &[&str] = &[
    "I.8.14",
    "I.10.7",
    "I.11.19",
    "I.12.2",
    "I.12.11",
    "I.13.4",
    "I.13.12",
    "I.15.10",
    "I.16.6",
    "I.18.4",
    "I.24.6",
    "I.29.4",
    "I.32.5",
    "I.34.8",
    "I.34.10",
    "I.34.27",
    "I.38.12",
    "I.39.10",
    "I.39.11",
    "I.43.31",
    "I.43.43",
    "I.48.2",
    "II.6.11",
    "II.8.7",
    "II.11.3",
    "II.21.32",
    "II.34.2",
    "II.34.2a",
    "II.34.29a",
    "II.37.1",
    "III.4.32",
    "III.8.54",
    "III.13.18",
    "III.14.14",
    "III.15.12",
    "III.15.14",
    "III.17.37",
    "III.19.51",
    "B8",
    "B18",
];

const HARD_EQUATIONS: &[&str] = &[
    "I.6.20",
    "I.6.20a",
    "I.6.20b",
    "I.9.18",
    "I.15.3t",
    "I.15.3x",
    "I.29.16",
    "I.30.3",
    "I.32.17",
    "I.34.14",
    "I.37.4",
    "I.39.22",
    "I.40.1",
    "I.41.16",
    "I.44.4",
    "I.50.26",
    "II.6.15a",
    "II.6.15b",
    "II.11.17",
    "II.11.20",
    "II.11.27",
    "II.11.28",
    "II.13.23",
    "II.13.34",
    "II.24.17",
    "II.35.18",
    "II.35.21",
    "II.36.38",
    "III.4.33",
    "III.9.52",
    "III.10.19",
    "III.21.20",
    "B1",
    "B2",
    "B3",
    "B4",
    "B5",
    "B6",
    "B7",
    "B9",
    "B10",
    "B11",
    "B12",
    "B13",
    "B14",
    "B15",
    "B16",
    "B17",
    "B19",
    "B20",
];

const FEYNMAN_TIERS: [TierSpec; 3] = [
    TierSpec::new(
        Tier::Easy,
        "yoshitomo-matsubara/srsd-feynman_easy",
        EASY_EQUATIONS,
        PartitionSizes::FEYNMAN,
    ),
    TierSpec::new(
        Tier::Medium,
        "yoshitomo-matsubara/srsd-feynman_medium",
        MEDIUM_EQUATIONS,
        PartitionSizes::FEYNMAN,
    ),
    TierSpec::new(
        Tier::Hard,
        "yoshitomo-matsubara/srsd-feynman_hard",
        HARD_EQUATIONS,
        PartitionSizes::FEYNMAN,
    ),
];

/// Immutable table of tier descriptions.
///
/// # Examples
/// ```
/// use feynman_core::Catalog;
///
/// let catalog = Catalog::feynman();
/// let hard = catalog.lookup("hard").expect("hard tier is built in");
/// assert_eq!(hard.repository(), "yoshitomo-matsubara/srsd-feynman_hard");
/// assert_eq!(hard.equation_count(), 50);
/// assert!(catalog.lookup("extreme").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    tiers: Vec<TierSpec>,
}

impl Catalog {
    /// Returns the built-in SRSD Feynman catalog.
    #[must_use]
    pub fn feynman() -> Self {
        Self::new(FEYNMAN_TIERS.to_vec())
    }

    /// Builds a catalog from explicit tier descriptions.
    ///
    /// When several entries describe the same tier the first one wins.
    #[must_use]
    pub const fn new(tiers: Vec<TierSpec>) -> Self {
        Self { tiers }
    }

    /// Returns every tier description in catalog order.
    #[must_use]
    pub fn tiers(&self) -> &[TierSpec] {
        &self.tiers
    }

    /// Returns the description of `tier`.
    ///
    /// # Errors
    /// Returns [`CatalogError::MissingTier`] when the catalog has no entry for
    /// `tier`.
    pub fn spec(&self, tier: Tier) -> Result<&TierSpec, CatalogError> {
        self.tiers
            .iter()
            .find(|spec| spec.tier == tier)
            .ok_or(CatalogError::MissingTier { tier })
    }

    /// Resolves a tier by name and returns its description.
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownTier`] for unrecognised names and
    /// [`CatalogError::MissingTier`] when the tier has no entry.
    pub fn lookup(&self, name: &str) -> Result<&TierSpec, CatalogError> {
        let tier = name.parse::<Tier>()?;
        self.spec(tier)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::feynman()
    }
}
