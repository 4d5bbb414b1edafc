use std::collections::HashSet;
use tracing::debug;

use space_tree_core::{
    assign_to_collection, claim_remaining, classify_title, reconcile_counts, CardCollection,
    Classification, ContentItem, ContentRecord, SpaceCard, SpaceStructure, UsedIds,
};

use crate::analyzer::detect_urgency;
use crate::taxonomy::{CardSource, CardSpec, CollectionSpec, Taxonomy};

/// Builds a card/collection structure in which every input id lands in
/// exactly one collection. Cards and collections claim records in
/// declaration order; whatever is left goes to the catch-all card.
pub struct SpaceDesigner<'t> {
    taxonomy: &'t Taxonomy,
}

struct Classified<'a> {
    record: &'a ContentRecord,
    specialties: Classification,
}

impl<'t> SpaceDesigner<'t> {
    pub fn new(taxonomy: &'t Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn design(&self, records: &[ContentRecord]) -> SpaceStructure {
        let classified: Vec<Classified<'_>> = records
            .iter()
            .map(|record| Classified {
                record,
                specialties: classify_title(&record.title, &self.taxonomy.specialties),
            })
            .collect();

        let mut used = UsedIds::new();
        let mut cards: Vec<SpaceCard> = self
            .taxonomy
            .cards
            .iter()
            .map(|spec| self.build_card(spec, &classified, &mut used))
            .collect();

        let leftover = claim_remaining(records, &mut used);
        if !leftover.is_empty() {
            let spec = &self.taxonomy.catch_all;
            debug!(card = %spec.id, items = leftover.len(), "catch-all");
            let collection = self.collection(&spec.collection, &leftover, &classified);
            cards.push(SpaceCard {
                id: spec.id.clone(),
                title: spec.title.clone(),
                color: spec.color.clone(),
                description: spec.description.clone(),
                priority: spec.priority,
                content_count: 0,
                collections: vec![collection],
            });
        }

        let mut structure = SpaceStructure::new(cards);
        reconcile_counts(&mut structure);
        structure.analysis_summary.total_items_analyzed = records
            .iter()
            .map(|r| r.id.as_str())
            .collect::<HashSet<_>>()
            .len();
        structure.taxonomy_version = Some(self.taxonomy.version);
        structure
    }

    fn build_card<'a>(
        &self,
        spec: &CardSpec,
        classified: &[Classified<'a>],
        used: &mut UsedIds,
    ) -> SpaceCard {
        let pool: Vec<&'a ContentRecord> = classified
            .iter()
            .filter(|c| match &spec.source {
                CardSource::Specialties(labels) => labels
                    .iter()
                    .any(|label| c.specialties.contains(label.as_str())),
                CardSource::ContentTypes(types) => types.contains(&c.record.content_type),
            })
            .map(|c| c.record)
            .collect();

        let mut collections: Vec<CardCollection> = spec
            .collections
            .iter()
            .map(|collection| {
                let claimed = assign_to_collection(&pool, &collection.keywords_lower(), used);
                debug!(
                    card = %spec.id,
                    collection = %collection.id,
                    items = claimed.len(),
                    "assigned"
                );
                self.collection(collection, &claimed, classified)
            })
            .collect();

        if let Some(general) = &spec.general {
            let rest = claim_remaining(pool.iter().copied(), used);
            debug!(card = %spec.id, collection = %general.id, items = rest.len(), "general");
            collections.push(self.collection(general, &rest, classified));
        }

        SpaceCard {
            id: spec.id.clone(),
            title: spec.title.clone(),
            color: spec.color.clone(),
            description: spec.description.clone(),
            priority: spec.priority,
            content_count: 0,
            collections,
        }
    }

    fn collection(
        &self,
        spec: &CollectionSpec,
        records: &[&ContentRecord],
        classified: &[Classified<'_>],
    ) -> CardCollection {
        let items = records
            .iter()
            .map(|record| {
                let specialty = classified
                    .iter()
                    .find(|c| std::ptr::eq(c.record, *record))
                    .and_then(|c| c.specialties.first().cloned())
                    .unwrap_or_else(|| self.taxonomy.fallback_specialty.clone());
                ContentItem::from_record(record, specialty, detect_urgency(&record.title_lower()))
            })
            .collect();

        CardCollection::new(&spec.id, &spec.title, &spec.description, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use space_tree_core::{verify_coverage, ContentType, Urgency};

    fn record(id: &str, title: &str, content_type: ContentType) -> ContentRecord {
        ContentRecord::new(id, title, content_type).with_file_url(format!("space/{id}"))
    }

    fn library() -> Vec<ContentRecord> {
        vec![
            record("v1", "ECMO Cannulation Video", ContentType::Video),
            record("v2", "Laparoscopic Appendectomy", ContentType::Video),
            record("v3", "Neonatal Hernia Repair", ContentType::Video),
            record("v4", "Emergency Trauma Surgery", ContentType::Video),
            record("g1", "ECMO Anticoagulation Guideline", ContentType::Guideline),
            record("g2", "NICU Dosing Guideline", ContentType::Guideline),
            record("d1", "Resident Curriculum 2024", ContentType::Document),
            record("d2", "Fellowship Case Requirements", ContentType::Document),
            record("i1", "Unrelated Memo", ContentType::Image),
            record("i2", "", ContentType::Image),
        ]
    }

    fn collection_ids<'s>(structure: &'s SpaceStructure, id: &str) -> Vec<&'s str> {
        structure
            .collection(id)
            .map(|c| c.items.iter().map(|i| i.id.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn every_record_lands_exactly_once() {
        let taxonomy = Taxonomy::default();
        let records = library();
        let structure = SpaceDesigner::new(&taxonomy).design(&records);

        verify_coverage(&structure, &records).unwrap();
        assert_eq!(structure.total_content, records.len());
        assert_eq!(structure.analysis_summary.total_items_analyzed, records.len());
        assert_eq!(structure.analysis_summary.total_items_included, records.len());
    }

    #[test]
    fn earlier_cards_claim_contested_records() {
        let taxonomy = Taxonomy::default();
        let structure = SpaceDesigner::new(&taxonomy).design(&library());

        assert_eq!(collection_ids(&structure, "ecmo-management"), vec!["v1", "g1"]);
        assert_eq!(collection_ids(&structure, "emergency-procedures"), vec!["v4"]);
        assert_eq!(collection_ids(&structure, "general-surgery"), vec!["v2"]);
        assert_eq!(collection_ids(&structure, "neonatal-surgery"), vec!["v3"]);
        assert!(collection_ids(&structure, "critical-care-guidelines").is_empty());
    }

    #[test]
    fn substring_matches_pull_records_into_earlier_cards() {
        let taxonomy = Taxonomy::default();
        let structure = SpaceDesigner::new(&taxonomy).design(&library());

        // "nicu" and "curriculum" both contain "icu"
        assert_eq!(
            collection_ids(&structure, "critical-care-general"),
            vec!["g2", "d1"]
        );
    }

    #[test]
    fn content_type_cards_take_unclaimed_records_of_their_types() {
        let taxonomy = Taxonomy::default();
        let structure = SpaceDesigner::new(&taxonomy).design(&library());

        assert_eq!(collection_ids(&structure, "fellowship-program"), vec!["d2"]);
        assert!(collection_ids(&structure, "resident-training").is_empty());
        assert!(collection_ids(&structure, "general-guidelines").is_empty());
    }

    #[test]
    fn unclaimed_records_form_catch_all() {
        let taxonomy = Taxonomy::default();
        let structure = SpaceDesigner::new(&taxonomy).design(&library());

        let last = structure.space_cards.last().unwrap();
        assert_eq!(last.id, "additional-specialties");
        assert_eq!(collection_ids(&structure, "additional-procedures"), vec!["i1", "i2"]);

        let memo = structure.items().find(|i| i.id == "i1").unwrap();
        assert_eq!(memo.specialty, "general");
        assert_eq!(memo.urgency, Urgency::Routine);
    }

    #[test]
    fn catch_all_is_omitted_when_empty() {
        let taxonomy = Taxonomy::default();
        let records = vec![record("v1", "ECMO Cannulation", ContentType::Video)];
        let structure = SpaceDesigner::new(&taxonomy).design(&records);

        assert!(structure.card("additional-specialties").is_none());
        assert_eq!(structure.space_cards.len(), taxonomy.cards.len());
    }

    #[test]
    fn items_carry_specialty_and_urgency() {
        let taxonomy = Taxonomy::default();
        let structure = SpaceDesigner::new(&taxonomy).design(&library());

        let trauma = structure.items().find(|i| i.id == "v4").unwrap();
        assert_eq!(trauma.specialty, "surgical");
        assert_eq!(trauma.urgency, Urgency::Urgent);

        let ecmo = structure.items().find(|i| i.id == "v1").unwrap();
        assert_eq!(ecmo.specialty, "cardiovascular");
        assert_eq!(ecmo.file_url, "space/v1");
    }

    #[test]
    fn duplicate_ids_are_placed_once() {
        let taxonomy = Taxonomy::default();
        let mut records = library();
        records.push(record("v1", "ECMO Cannulation Copy", ContentType::Video));
        let structure = SpaceDesigner::new(&taxonomy).design(&records);

        assert_eq!(structure.items().filter(|i| i.id == "v1").count(), 1);
        assert_eq!(structure.analysis_summary.total_items_analyzed, 10);
        assert_eq!(structure.total_content, 10);
    }

    #[test]
    fn structure_carries_taxonomy_version() {
        let taxonomy = Taxonomy::default();
        let structure = SpaceDesigner::new(&taxonomy).design(&[]);

        assert_eq!(structure.taxonomy_version, Some(taxonomy.version));
        assert_eq!(structure.total_content, 0);
    }
}
