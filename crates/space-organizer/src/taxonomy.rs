use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use space_tree_core::{normalize_keywords, ContentType, KeywordSet, Label, Priority};

pub const TAXONOMY_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("duplicate card id: {0}")]
    DuplicateCard(String),
    #[error("duplicate collection id: {0}")]
    DuplicateCollection(String),
    #[error("collection {0} lists only blank keywords")]
    BlankKeywords(String),
    #[error("card {card} references unknown specialty {specialty}")]
    UnknownSpecialty { card: String, specialty: Label },
}

/// Where a card draws its candidate records from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSource {
    /// Records whose title matches any of these specialty labels.
    Specialties(Vec<Label>),
    ContentTypes(Vec<ContentType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CollectionSpec {
    fn new(id: &str, title: &str, description: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Lowercased keywords without blanks or repeats.
    pub fn keywords_lower(&self) -> Vec<String> {
        normalize_keywords(self.keywords.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSpec {
    pub id: String,
    pub title: String,
    pub color: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub source: CardSource,
    pub collections: Vec<CollectionSpec>,
    /// Receives the card's pool records that no keyword collection claimed.
    #[serde(default)]
    pub general: Option<CollectionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchAllSpec {
    pub id: String,
    pub title: String,
    pub color: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub collection: CollectionSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub version: u32,
    pub specialties: KeywordSet,
    pub procedures: KeywordSet,
    pub fallback_specialty: Label,
    pub cards: Vec<CardSpec>,
    pub catch_all: CatchAllSpec,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            version: TAXONOMY_VERSION,
            specialties: default_specialties(),
            procedures: default_procedures(),
            fallback_specialty: Label::new("general"),
            cards: default_cards(),
            catch_all: default_catch_all(),
        }
    }
}

impl Taxonomy {
    pub fn validate(&self) -> Result<(), TaxonomyError> {
        let mut card_ids = HashSet::new();
        let mut collection_ids = HashSet::new();

        let catch_all_collections = std::iter::once(&self.catch_all.collection);

        for card in &self.cards {
            if !card_ids.insert(card.id.as_str()) {
                return Err(TaxonomyError::DuplicateCard(card.id.clone()));
            }
            if let CardSource::Specialties(labels) = &card.source {
                if let Some(unknown) = labels
                    .iter()
                    .find(|l| self.specialties.get(l.as_str()).is_none())
                {
                    return Err(TaxonomyError::UnknownSpecialty {
                        card: card.id.clone(),
                        specialty: unknown.clone(),
                    });
                }
            }
        }
        if !card_ids.insert(self.catch_all.id.as_str()) {
            return Err(TaxonomyError::DuplicateCard(self.catch_all.id.clone()));
        }

        self.cards
            .iter()
            .flat_map(|card| card.collections.iter().chain(card.general.iter()))
            .chain(catch_all_collections)
            .try_for_each(|collection| {
                if !collection_ids.insert(collection.id.as_str()) {
                    return Err(TaxonomyError::DuplicateCollection(collection.id.clone()));
                }
                if !collection.keywords.is_empty() && collection.keywords_lower().is_empty() {
                    return Err(TaxonomyError::BlankKeywords(collection.id.clone()));
                }
                Ok(())
            })
    }

    pub fn card(&self, id: &str) -> Option<&CardSpec> {
        self.cards.iter().find(|c| c.id == id)
    }
}

fn keyword_set(pairs: &[(&str, &[&str])]) -> KeywordSet {
    // Built-in tables are static; `default_taxonomy_is_valid` pins their sizes.
    KeywordSet::from_pairs(pairs).unwrap_or_default()
}

fn default_specialties() -> KeywordSet {
    keyword_set(&[
        (
            "cardiovascular",
            &["cardiac", "heart", "vascular", "ecmo", "cpr", "circulation"],
        ),
        (
            "respiratory",
            &["lung", "pulmonary", "respiratory", "breathing", "oxygen"],
        ),
        (
            "gastrointestinal",
            &[
                "gi",
                "gastrointestinal",
                "stomach",
                "intestine",
                "bowel",
                "appendectomy",
                "cholecystectomy",
            ],
        ),
        ("neurological", &["brain", "neurological", "neural", "cns"]),
        (
            "urological",
            &["kidney", "renal", "urinary", "bladder", "urological"],
        ),
        (
            "orthopedic",
            &["bone", "joint", "muscle", "orthopedic", "fracture"],
        ),
        (
            "neonatal",
            &["neonatal", "newborn", "infant", "nicu", "premature"],
        ),
        ("pediatric", &["pediatric", "child", "children"]),
        (
            "surgical",
            &["surgery", "surgical", "operation", "procedure", "laparoscopic"],
        ),
        (
            "critical_care",
            &["critical", "icu", "emergency", "trauma", "life support"],
        ),
        ("anesthesia", &["anesthesia", "sedation", "pain", "analgesia"]),
        (
            "infectious_disease",
            &["infection", "antibiotic", "sepsis", "bacterial"],
        ),
        ("oncology", &["cancer", "tumor", "oncology", "chemotherapy"]),
        (
            "endocrinology",
            &["diabetes", "hormone", "endocrine", "insulin"],
        ),
    ])
}

fn default_procedures() -> KeywordSet {
    keyword_set(&[
        ("cannulation", &["cannulation", "cannula", "line placement"]),
        ("decannulation", &["decannulation", "line removal"]),
        ("tracheostomy", &["tracheostomy", "trach"]),
        ("gastrostomy", &["gastrostomy", "g-tube", "feeding tube"]),
        ("hernia_repair", &["hernia", "hernia repair"]),
        ("appendectomy", &["appendectomy", "appendix"]),
        ("cholecystectomy", &["cholecystectomy", "gallbladder"]),
        (
            "laparoscopic",
            &["laparoscopic", "laparoscopy", "minimally invasive"],
        ),
        ("thoracoscopic", &["thoracoscopic", "thoracoscopy"]),
        (
            "vascular_access",
            &["vascular access", "central line", "iv line"],
        ),
        ("wound_care", &["wound", "dressing", "healing"]),
        ("medication", &["medication", "drug", "dosing", "pharmacology"]),
    ])
}

fn specialties(labels: &[&str]) -> CardSource {
    CardSource::Specialties(labels.iter().copied().map(Label::new).collect())
}

fn default_cards() -> Vec<CardSpec> {
    vec![
        CardSpec {
            id: "critical-care-life-support".into(),
            title: "Critical Care & Life Support".into(),
            color: "#dc2626".into(),
            description: "Life-saving procedures and critical care management".into(),
            priority: Priority::Highest,
            source: specialties(&["critical_care", "cardiovascular"]),
            collections: vec![
                CollectionSpec::new(
                    "ecmo-management",
                    "ECMO Management",
                    "ECMO cannulation, decannulation, and management",
                    &["ecmo"],
                ),
                CollectionSpec::new(
                    "emergency-procedures",
                    "Emergency Procedures",
                    "Emergency trauma surgery and life-saving procedures",
                    &["emergency", "trauma", "cpr"],
                ),
                CollectionSpec::new(
                    "vascular-access",
                    "Vascular Access",
                    "Central line placement and vascular procedures",
                    &["vascular", "central line", "cannulation"],
                ),
            ],
            general: Some(CollectionSpec::new(
                "critical-care-general",
                "Critical Care General",
                "Other critical care procedures and protocols",
                &[],
            )),
        },
        CardSpec {
            id: "surgical-procedures".into(),
            title: "Surgical Procedures".into(),
            color: "#7c3aed".into(),
            description: "General and specialized surgical procedures".into(),
            priority: Priority::High,
            source: specialties(&["surgical", "gastrointestinal"]),
            collections: vec![
                CollectionSpec::new(
                    "general-surgery",
                    "General Surgery",
                    "Appendectomy, cholecystectomy, hernia repair",
                    &["appendectomy", "cholecystectomy", "hernia"],
                ),
                CollectionSpec::new(
                    "minimally-invasive",
                    "Minimally Invasive Surgery",
                    "Laparoscopic and thoracoscopic procedures",
                    &["laparoscopic", "thoracoscopic", "minimally invasive"],
                ),
            ],
            general: Some(CollectionSpec::new(
                "specialized-surgery",
                "Specialized Surgery",
                "Complex surgical procedures",
                &[],
            )),
        },
        CardSpec {
            id: "neonatal-pediatric-care".into(),
            title: "Neonatal & Pediatric Care".into(),
            color: "#059669".into(),
            description: "Specialized care for newborns and children".into(),
            priority: Priority::High,
            source: specialties(&["neonatal", "pediatric"]),
            collections: vec![
                CollectionSpec::new(
                    "neonatal-surgery",
                    "Neonatal Surgery",
                    "Surgical procedures for newborns",
                    &["neonatal"],
                ),
                CollectionSpec::new(
                    "pediatric-surgery",
                    "Pediatric Surgery",
                    "Surgical procedures for children",
                    &["pediatric"],
                ),
                CollectionSpec::new(
                    "feeding-nutrition",
                    "Feeding & Nutrition",
                    "Gastrostomy and feeding procedures",
                    &["feeding", "gastrostomy", "nutrition", "g-tube"],
                ),
            ],
            general: Some(CollectionSpec::new(
                "neonatal-pediatric-general",
                "Neonatal & Pediatric General",
                "Other neonatal and pediatric procedures",
                &[],
            )),
        },
        CardSpec {
            id: "clinical-guidelines".into(),
            title: "Clinical Guidelines & Protocols".into(),
            color: "#0891b2".into(),
            description: "Clinical protocols and evidence-based guidelines".into(),
            priority: Priority::High,
            source: CardSource::ContentTypes(vec![ContentType::Guideline]),
            collections: vec![
                CollectionSpec::new(
                    "critical-care-guidelines",
                    "Critical Care Guidelines",
                    "ECMO, sepsis, and critical care protocols",
                    &["ecmo", "sepsis", "critical", "cpr"],
                ),
                CollectionSpec::new(
                    "surgical-guidelines",
                    "Surgical Guidelines",
                    "Surgical protocols and procedures",
                    &["surgical", "surgery", "appendectomy", "antibiotic"],
                ),
                CollectionSpec::new(
                    "neonatal-guidelines",
                    "Neonatal Guidelines",
                    "Neonatal and pediatric care protocols",
                    &["neonatal", "nicu", "pediatric", "dosing"],
                ),
            ],
            general: Some(CollectionSpec::new(
                "general-guidelines",
                "General Guidelines",
                "Other clinical guidelines and protocols",
                &[],
            )),
        },
        CardSpec {
            id: "education-training".into(),
            title: "Education & Training".into(),
            color: "#be185d".into(),
            description: "Educational materials and training resources".into(),
            priority: Priority::Medium,
            source: CardSource::ContentTypes(vec![ContentType::Document]),
            collections: vec![
                CollectionSpec::new(
                    "resident-training",
                    "Resident Training",
                    "Resident curriculum and training materials",
                    &["resident", "curriculum", "training"],
                ),
                CollectionSpec::new(
                    "fellowship-program",
                    "Fellowship Program",
                    "Fellowship training and case requirements",
                    &["fellow", "fellowship", "case", "requirements"],
                ),
                CollectionSpec::new(
                    "competency-assessment",
                    "Competency Assessment",
                    "Goals, objectives, and competency tracking",
                    &["goals", "objectives", "competencies", "tracked"],
                ),
            ],
            general: Some(CollectionSpec::new(
                "general-education",
                "General Education",
                "Other educational materials and documents",
                &[],
            )),
        },
    ]
}

fn default_catch_all() -> CatchAllSpec {
    CatchAllSpec {
        id: "additional-specialties".into(),
        title: "Additional Medical Specialties".into(),
        color: "#6b7280".into(),
        description: "Other medical specialties and procedures".into(),
        priority: Priority::Medium,
        collection: CollectionSpec::new(
            "additional-procedures",
            "Additional Procedures",
            "Other medical procedures and specialties",
            &[],
        ),
    }
}
