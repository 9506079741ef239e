//! Taxonomic rank and kingdom vocabularies.
//!
//! Tags follow the upper-case enum names used by the backbone database dumps,
//! e.g. `SPECIES` or `INFRASPECIFIC_NAME`. Kingdoms are identified in the bulk
//! feed by the usage key of their backbone kingdom record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomic ranks, ordered from highest to lowest.
///
/// The trailing `Informal`, `Other` and `Unranked` values are not part of the
/// Linnean hierarchy.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Domain,
    Superkingdom,
    Kingdom,
    Subkingdom,
    Superphylum,
    Phylum,
    Subphylum,
    Superclass,
    Class,
    Subclass,
    Infraclass,
    Superorder,
    Order,
    Suborder,
    Infraorder,
    Superfamily,
    Family,
    Subfamily,
    Tribe,
    Subtribe,
    SupragenericName,
    Genus,
    Subgenus,
    Section,
    Series,
    InfragenericName,
    SpeciesAggregate,
    Species,
    /// Some infraspecific rank that is not known more precisely.
    InfraspecificName,
    Subspecies,
    /// Some infraspecific rank below subspecies.
    InfrasubspecificName,
    Variety,
    Subvariety,
    Form,
    Subform,
    CultivarGroup,
    Cultivar,
    Strain,
    Informal,
    Other,
    Unranked,
}

impl Rank {
    /// All ranks in declaration order.
    pub const ALL: [Rank; 41] = [
        Rank::Domain,
        Rank::Superkingdom,
        Rank::Kingdom,
        Rank::Subkingdom,
        Rank::Superphylum,
        Rank::Phylum,
        Rank::Subphylum,
        Rank::Superclass,
        Rank::Class,
        Rank::Subclass,
        Rank::Infraclass,
        Rank::Superorder,
        Rank::Order,
        Rank::Suborder,
        Rank::Infraorder,
        Rank::Superfamily,
        Rank::Family,
        Rank::Subfamily,
        Rank::Tribe,
        Rank::Subtribe,
        Rank::SupragenericName,
        Rank::Genus,
        Rank::Subgenus,
        Rank::Section,
        Rank::Series,
        Rank::InfragenericName,
        Rank::SpeciesAggregate,
        Rank::Species,
        Rank::InfraspecificName,
        Rank::Subspecies,
        Rank::InfrasubspecificName,
        Rank::Variety,
        Rank::Subvariety,
        Rank::Form,
        Rank::Subform,
        Rank::CultivarGroup,
        Rank::Cultivar,
        Rank::Strain,
        Rank::Informal,
        Rank::Other,
        Rank::Unranked,
    ];

    /// Parses an upper-case rank tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_tag() == tag)
    }

    /// The upper-case tag of this rank.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Rank::Domain => "DOMAIN",
            Rank::Superkingdom => "SUPERKINGDOM",
            Rank::Kingdom => "KINGDOM",
            Rank::Subkingdom => "SUBKINGDOM",
            Rank::Superphylum => "SUPERPHYLUM",
            Rank::Phylum => "PHYLUM",
            Rank::Subphylum => "SUBPHYLUM",
            Rank::Superclass => "SUPERCLASS",
            Rank::Class => "CLASS",
            Rank::Subclass => "SUBCLASS",
            Rank::Infraclass => "INFRACLASS",
            Rank::Superorder => "SUPERORDER",
            Rank::Order => "ORDER",
            Rank::Suborder => "SUBORDER",
            Rank::Infraorder => "INFRAORDER",
            Rank::Superfamily => "SUPERFAMILY",
            Rank::Family => "FAMILY",
            Rank::Subfamily => "SUBFAMILY",
            Rank::Tribe => "TRIBE",
            Rank::Subtribe => "SUBTRIBE",
            Rank::SupragenericName => "SUPRAGENERIC_NAME",
            Rank::Genus => "GENUS",
            Rank::Subgenus => "SUBGENUS",
            Rank::Section => "SECTION",
            Rank::Series => "SERIES",
            Rank::InfragenericName => "INFRAGENERIC_NAME",
            Rank::SpeciesAggregate => "SPECIES_AGGREGATE",
            Rank::Species => "SPECIES",
            Rank::InfraspecificName => "INFRASPECIFIC_NAME",
            Rank::Subspecies => "SUBSPECIES",
            Rank::InfrasubspecificName => "INFRASUBSPECIFIC_NAME",
            Rank::Variety => "VARIETY",
            Rank::Subvariety => "SUBVARIETY",
            Rank::Form => "FORM",
            Rank::Subform => "SUBFORM",
            Rank::CultivarGroup => "CULTIVAR_GROUP",
            Rank::Cultivar => "CULTIVAR",
            Rank::Strain => "STRAIN",
            Rank::Informal => "INFORMAL",
            Rank::Other => "OTHER",
            Rank::Unranked => "UNRANKED",
        }
    }

    /// True for all ranks below species, excluding the non-Linnean ones.
    pub fn is_infraspecific(&self) -> bool {
        *self > Rank::Species && !self.is_uncertain()
    }

    /// True for ranks that carry no hierarchical meaning.
    pub fn is_uncertain(&self) -> bool {
        matches!(self, Rank::Informal | Rank::Other | Rank::Unranked)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// The backbone kingdoms.
///
/// `IncertaeSedis` is the sentinel for records whose kingdom is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kingdom {
    IncertaeSedis,
    Animalia,
    Archaea,
    Bacteria,
    Chromista,
    Fungi,
    Plantae,
    Protozoa,
    Viruses,
}

impl Kingdom {
    /// All kingdoms ordered by their backbone usage key.
    pub const ALL: [Kingdom; 9] = [
        Kingdom::IncertaeSedis,
        Kingdom::Animalia,
        Kingdom::Archaea,
        Kingdom::Bacteria,
        Kingdom::Chromista,
        Kingdom::Fungi,
        Kingdom::Plantae,
        Kingdom::Protozoa,
        Kingdom::Viruses,
    ];

    /// Usage key of the kingdom record in the backbone.
    pub fn usage_key(&self) -> u32 {
        *self as u32
    }

    /// Resolves a backbone kingdom usage key.
    pub fn from_usage_key(key: u32) -> Option<Self> {
        Self::ALL.get(key as usize).copied()
    }

    /// Parses an upper-case kingdom tag such as `PLANTAE`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_tag() == tag)
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Kingdom::IncertaeSedis => "INCERTAE_SEDIS",
            Kingdom::Animalia => "ANIMALIA",
            Kingdom::Archaea => "ARCHAEA",
            Kingdom::Bacteria => "BACTERIA",
            Kingdom::Chromista => "CHROMISTA",
            Kingdom::Fungi => "FUNGI",
            Kingdom::Plantae => "PLANTAE",
            Kingdom::Protozoa => "PROTOZOA",
            Kingdom::Viruses => "VIRUSES",
        }
    }
}

impl fmt::Display for Kingdom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("SPECIES", Some(Rank::Species))]
    #[case("INFRASPECIFIC_NAME", Some(Rank::InfraspecificName))]
    #[case("UNRANKED", Some(Rank::Unranked))]
    #[case("species", None)]
    #[case("", None)]
    fn test_rank_from_tag(#[case] tag: &str, #[case] expected: Option<Rank>) {
        assert_eq!(Rank::from_tag(tag), expected);
    }

    #[test]
    fn test_rank_tags_roundtrip() {
        for rank in Rank::ALL {
            assert_eq!(Rank::from_tag(rank.as_tag()), Some(rank));
        }
    }

    #[rstest]
    #[case(Rank::Subspecies, true)]
    #[case(Rank::Variety, true)]
    #[case(Rank::InfraspecificName, true)]
    #[case(Rank::Strain, true)]
    #[case(Rank::Species, false)]
    #[case(Rank::Genus, false)]
    #[case(Rank::Unranked, false)]
    #[case(Rank::Other, false)]
    fn test_is_infraspecific(#[case] rank: Rank, #[case] expected: bool) {
        assert_eq!(rank.is_infraspecific(), expected);
    }

    #[test]
    fn test_kingdom_usage_keys() {
        assert_eq!(Kingdom::from_usage_key(0), Some(Kingdom::IncertaeSedis));
        assert_eq!(Kingdom::from_usage_key(4), Some(Kingdom::Chromista));
        assert_eq!(Kingdom::from_usage_key(7), Some(Kingdom::Protozoa));
        assert_eq!(Kingdom::from_usage_key(9), None);
        for k in Kingdom::ALL {
            assert_eq!(Kingdom::from_usage_key(k.usage_key()), Some(k));
            assert_eq!(Kingdom::from_tag(k.as_tag()), Some(k));
        }
    }
}
