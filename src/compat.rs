//! Rank and kingdom compatibility rules used to filter lookup candidates.

use crate::vocabulary::{Kingdom, Rank};
use std::sync::LazyLock;

const KINGDOMS: usize = Kingdom::ALL.len();

/// Kingdoms that historically absorbed members of other kingdoms.
/// Each entry lists the kingdoms a record may also have been classified in.
const PARAPHYLETIC: [(Kingdom, &[Kingdom]); 3] = [
    (
        Kingdom::Protozoa,
        &[Kingdom::Animalia, Kingdom::Fungi, Kingdom::Plantae],
    ),
    (
        Kingdom::Chromista,
        &[Kingdom::Animalia, Kingdom::Fungi, Kingdom::Plantae],
    ),
    (Kingdom::Archaea, &[Kingdom::Bacteria]),
];

/// Symmetric kingdom compatibility matrix, indexed by usage key.
static KINGDOM_MATRIX: LazyLock<[[bool; KINGDOMS]; KINGDOMS]> = LazyLock::new(|| {
    let expand = |k: Kingdom| -> Vec<Kingdom> {
        let mut set = vec![k];
        if let Some((_, extra)) = PARAPHYLETIC.iter().find(|(p, _)| *p == k) {
            set.extend_from_slice(extra);
        }
        set
    };

    let mut matrix = [[false; KINGDOMS]; KINGDOMS];
    for k1 in Kingdom::ALL {
        let set1 = expand(k1);
        for k2 in Kingdom::ALL {
            let compatible = k1 == Kingdom::IncertaeSedis
                || k2 == Kingdom::IncertaeSedis
                || expand(k2).iter().any(|k| set1.contains(k));
            matrix[k1.usage_key() as usize][k2.usage_key() as usize] = compatible;
        }
    }
    matrix
});

/// Returns true if the two ranks do not contradict each other.
///
/// `Unranked` is compatible with everything. `InfraspecificName` matches any
/// infraspecific rank, `InfrasubspecificName` any infraspecific rank except
/// subspecies. All other ranks must be identical.
pub fn rank_compatible(r1: Rank, r2: Rank) -> bool {
    if r1 == Rank::Unranked || r2 == Rank::Unranked {
        return true;
    }
    match (r1, r2) {
        (Rank::InfraspecificName, other) | (other, Rank::InfraspecificName) => {
            other.is_infraspecific()
        }
        (Rank::InfrasubspecificName, other) | (other, Rank::InfrasubspecificName) => {
            other.is_infraspecific() && other != Rank::Subspecies
        }
        _ => r1 == r2,
    }
}

/// Returns true if records of the two kingdoms may denote the same taxon.
pub fn kingdom_compatible(k1: Kingdom, k2: Kingdom) -> bool {
    KINGDOM_MATRIX[k1.usage_key() as usize][k2.usage_key() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(Rank::Species, Rank::Species, true)]
    #[case(Rank::Species, Rank::Genus, false)]
    #[case(Rank::Unranked, Rank::Genus, true)]
    #[case(Rank::Species, Rank::Unranked, true)]
    #[case(Rank::InfraspecificName, Rank::Subspecies, true)]
    #[case(Rank::InfraspecificName, Rank::Variety, true)]
    #[case(Rank::InfraspecificName, Rank::Species, false)]
    #[case(Rank::InfrasubspecificName, Rank::Subspecies, false)]
    #[case(Rank::InfrasubspecificName, Rank::Form, true)]
    #[case(Rank::Variety, Rank::InfrasubspecificName, true)]
    #[case(Rank::InfraspecificName, Rank::InfrasubspecificName, true)]
    #[case(Rank::Variety, Rank::Form, false)]
    fn test_rank_compatible(#[case] r1: Rank, #[case] r2: Rank, #[case] expected: bool) {
        assert_eq!(rank_compatible(r1, r2), expected);
        assert_eq!(rank_compatible(r2, r1), expected);
    }

    #[rstest]
    #[case(Kingdom::Animalia, Kingdom::Animalia, true)]
    #[case(Kingdom::Animalia, Kingdom::Protozoa, true)]
    #[case(Kingdom::Animalia, Kingdom::Plantae, false)]
    #[case(Kingdom::Plantae, Kingdom::Chromista, true)]
    #[case(Kingdom::Fungi, Kingdom::Protozoa, true)]
    #[case(Kingdom::Protozoa, Kingdom::Chromista, true)]
    #[case(Kingdom::Archaea, Kingdom::Bacteria, true)]
    #[case(Kingdom::Bacteria, Kingdom::Animalia, false)]
    #[case(Kingdom::Viruses, Kingdom::Fungi, false)]
    #[case(Kingdom::IncertaeSedis, Kingdom::Viruses, true)]
    #[case(Kingdom::Plantae, Kingdom::IncertaeSedis, true)]
    fn test_kingdom_compatible(
        #[case] k1: Kingdom,
        #[case] k2: Kingdom,
        #[case] expected: bool,
    ) {
        assert_eq!(kingdom_compatible(k1, k2), expected);
    }

    #[test]
    fn test_kingdom_matrix_is_symmetric() {
        for k1 in Kingdom::ALL {
            assert!(kingdom_compatible(k1, k1));
            for k2 in Kingdom::ALL {
                assert_eq!(kingdom_compatible(k1, k2), kingdom_compatible(k2, k1));
            }
        }
    }
}
