use blake3::Hasher;

use crate::structure::SpaceStructure;

pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(content);
    hasher.finalize().to_hex().to_string()
}

/// Digest of the structure's compact JSON.
pub fn structure_fingerprint(structure: &SpaceStructure) -> serde_json::Result<String> {
    serde_json::to_vec(structure).map(|bytes| hash_content(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{CardCollection, SpaceCard};

    fn one_card() -> SpaceStructure {
        SpaceStructure::new(vec![SpaceCard {
            id: "ecmo".into(),
            title: "ECMO".into(),
            color: "#dc2626".into(),
            description: String::new(),
            priority: Default::default(),
            content_count: 0,
            collections: vec![CardCollection::new("ecmo-videos", "ECMO Videos", "", Vec::new())],
        }])
    }

    #[test]
    fn equal_structures_share_a_fingerprint() {
        let fingerprint = structure_fingerprint(&one_card()).unwrap();

        assert_eq!(fingerprint, structure_fingerprint(&one_card()).unwrap());
        assert_eq!(fingerprint.len(), 64);
    }

    #[test]
    fn fingerprint_tracks_counts() {
        let a = SpaceStructure::new(Vec::new());
        let b = SpaceStructure {
            total_content: 1,
            ..a.clone()
        };
        assert_ne!(
            structure_fingerprint(&a).unwrap(),
            structure_fingerprint(&b).unwrap()
        );
    }

    #[test]
    fn fingerprint_tracks_card_titles() {
        let mut renamed = one_card();
        renamed.space_cards[0].title = "Extracorporeal Support".into();

        assert_ne!(
            structure_fingerprint(&one_card()).unwrap(),
            structure_fingerprint(&renamed).unwrap()
        );
    }
}
