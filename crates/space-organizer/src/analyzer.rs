//! Per-record heuristics: medical terms, document kind, specialty, urgency and a
//! priority score, plus a single-category view grouped into cards.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use space_tree_core::{slugify, ContentRecord, ContentType, KeywordSet, Urgency};

const PRIORITY_ITEMS: usize = 10;
const COLLECTION_ITEMS: usize = 20;
const MAX_PRIORITY_SCORE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    Neonatal,
    Pediatric,
    CriticalCare,
    Surgery,
    Emergency,
    Ecmo,
    Unknown,
}

impl Specialty {
    fn phrase(&self) -> Option<&'static str> {
        match self {
            Self::Neonatal => Some("Neonatal care"),
            Self::Pediatric => Some("Pediatric care"),
            Self::CriticalCare => Some("Critical care"),
            Self::Surgery => Some("Surgical procedures"),
            Self::Emergency => Some("Emergency care"),
            Self::Ecmo => Some("ECMO management"),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Neonatal => "neonatal",
            Self::Pediatric => "pediatric",
            Self::CriticalCare => "critical_care",
            Self::Surgery => "surgery",
            Self::Emergency => "emergency",
            Self::Ecmo => "ecmo",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Guideline,
    Protocol,
    Procedure,
    Policy,
    Checklist,
    Unknown,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Guideline => "guideline",
            Self::Protocol => "protocol",
            Self::Procedure => "procedure",
            Self::Policy => "policy",
            Self::Checklist => "checklist",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Complex,
    Moderate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Category {
    #[serde(rename = "Critical Care & ECMO")]
    CriticalCareEcmo,
    #[serde(rename = "Neonatal & NICU")]
    NeonatalNicu,
    #[serde(rename = "Surgical Procedures")]
    SurgicalProcedures,
    #[serde(rename = "Emergency & Trauma")]
    EmergencyTrauma,
    #[serde(rename = "Pediatric Care")]
    PediatricCare,
    #[serde(rename = "General Medical")]
    GeneralMedical,
}

impl Category {
    pub fn from_specialty(specialty: Specialty) -> Self {
        match specialty {
            Specialty::Neonatal => Self::NeonatalNicu,
            Specialty::Pediatric => Self::PediatricCare,
            Specialty::CriticalCare | Specialty::Ecmo => Self::CriticalCareEcmo,
            Specialty::Surgery => Self::SurgicalProcedures,
            Specialty::Emergency => Self::EmergencyTrauma,
            Specialty::Unknown => Self::GeneralMedical,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::CriticalCareEcmo => "Critical Care & ECMO",
            Self::NeonatalNicu => "Neonatal & NICU",
            Self::SurgicalProcedures => "Surgical Procedures",
            Self::EmergencyTrauma => "Emergency & Trauma",
            Self::PediatricCare => "Pediatric Care",
            Self::GeneralMedical => "General Medical",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::CriticalCareEcmo => "#dc2626",
            Self::NeonatalNicu => "#059669",
            Self::SurgicalProcedures => "#7c3aed",
            Self::EmergencyTrauma => "#ea580c",
            Self::PediatricCare => "#0891b2",
            Self::GeneralMedical => "#6b7280",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilenameAnalysis {
    pub keywords: Vec<String>,
    pub medical_terms: Vec<String>,
    pub content_type: DocumentKind,
    pub specialty: Specialty,
    pub urgency: Urgency,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoAnalysis {
    pub keywords: Vec<String>,
    pub procedure_type: String,
    pub specialty: Specialty,
    pub complexity: Complexity,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentAnalysis {
    Video(VideoAnalysis),
    Filename(FilenameAnalysis),
    Empty,
}

impl ContentAnalysis {
    fn keywords(&self) -> &[String] {
        match self {
            Self::Video(v) => &v.keywords,
            Self::Filename(f) => &f.keywords,
            Self::Empty => &[],
        }
    }

    fn specialty(&self) -> Option<Specialty> {
        match self {
            Self::Video(v) => Some(v.specialty),
            Self::Filename(f) => Some(f.specialty),
            Self::Empty => None,
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            Self::Video(v) => Some(&v.description),
            Self::Filename(f) => Some(&f.description),
            Self::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemAnalysis {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub file_url: String,
    pub size: Option<u64>,
    pub last_modified: Option<String>,
    pub filename_analysis: FilenameAnalysis,
    pub content_analysis: ContentAnalysis,
    pub recommended_category: Category,
    pub priority_score: u32,
    pub keywords: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeCollection {
    pub id: String,
    pub title: String,
    pub items: Vec<ItemAnalysis>,
    pub total_count: usize,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCard {
    pub id: String,
    pub title: Category,
    pub color: String,
    pub total_items: usize,
    pub priority_items: Vec<ItemAnalysis>,
    pub collections: Vec<TypeCollection>,
}

const PROCEDURE_MAPPING: &[(&str, &str)] = &[
    ("appendectomy", "Appendectomy procedure"),
    ("cholecystectomy", "Cholecystectomy procedure"),
    ("hernia", "Hernia repair surgery"),
    ("ecmo cannulation", "ECMO cannulation procedure"),
    ("ecmo decannulation", "ECMO decannulation procedure"),
    ("central line", "Central line placement"),
    ("tracheostomy", "Tracheostomy procedure"),
    ("gastrostomy", "Gastrostomy tube placement"),
    ("laparoscopic", "Laparoscopic surgery"),
    ("thoracoscopic", "Thoracoscopic procedure"),
];

const DOCUMENT_KINDS: &[(&str, DocumentKind)] = &[
    ("guideline", DocumentKind::Guideline),
    ("protocol", DocumentKind::Protocol),
    ("procedure", DocumentKind::Procedure),
    ("policy", DocumentKind::Policy),
    ("checklist", DocumentKind::Checklist),
];

const FILENAME_SPECIALTIES: &[(&[&str], Specialty)] = &[
    (&["nicu", "neonatal"], Specialty::Neonatal),
    (&["picu", "pediatric"], Specialty::Pediatric),
    (&["icu", "critical"], Specialty::CriticalCare),
    (&["surgery", "surgical"], Specialty::Surgery),
    (&["emergency", "trauma"], Specialty::Emergency),
    (&["ecmo"], Specialty::Ecmo),
];

const TITLE_SPECIALTIES: &[(&[&str], Specialty)] = &[
    (&["ecmo", "cannulation", "decannulation"], Specialty::Ecmo),
    (&["neonatal", "nicu"], Specialty::Neonatal),
    (&["pediatric", "child"], Specialty::Pediatric),
    (&["surgery", "surgical"], Specialty::Surgery),
    (&["emergency", "trauma"], Specialty::Emergency),
];

const URGENT_TERMS: &[&str] = &["emergency", "urgent", "stat", "critical"];
const COMPLEX_TERMS: &[&str] = &["ecmo", "cannulation", "tracheostomy", "laparoscopic"];

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

fn first_specialty(text: &str, table: &[(&[&str], Specialty)]) -> Specialty {
    table
        .iter()
        .find(|(terms, _)| contains_any(text, terms))
        .map(|(_, specialty)| *specialty)
        .unwrap_or(Specialty::Unknown)
}

/// `urgent` when a lowercased text names an emergency, otherwise `routine`.
pub fn detect_urgency(text_lower: &str) -> Urgency {
    if contains_any(text_lower, URGENT_TERMS) {
        Urgency::Urgent
    } else {
        Urgency::Routine
    }
}

fn type_score(content_type: ContentType) -> u32 {
    match content_type {
        ContentType::Guideline => 10,
        ContentType::Video => 7,
        ContentType::Document => 6,
        ContentType::Image => 5,
    }
}

pub struct ContentAnalyzer {
    terms: KeywordSet,
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new(default_medical_terms())
    }
}

impl ContentAnalyzer {
    pub fn new(terms: KeywordSet) -> Self {
        Self { terms }
    }

    pub fn analyze_filename(&self, filename: &str) -> FilenameAnalysis {
        let lower = filename.to_lowercase();

        let mut seen = HashSet::new();
        let medical_terms: Vec<String> = self
            .terms
            .rules()
            .iter()
            .flat_map(|rule| rule.matches_in(&lower))
            .filter(|term| seen.insert(*term))
            .map(String::from)
            .collect();

        let content_type = DOCUMENT_KINDS
            .iter()
            .find(|(term, _)| lower.contains(term))
            .map(|(_, kind)| *kind)
            .unwrap_or(DocumentKind::Unknown);

        let specialty = first_specialty(&lower, FILENAME_SPECIALTIES);
        let urgency = detect_urgency(&lower);
        let description = describe(specialty, content_type, &medical_terms, urgency);

        FilenameAnalysis {
            keywords: medical_terms.clone(),
            medical_terms,
            content_type,
            specialty,
            urgency,
            description,
        }
    }

    pub fn analyze_video(&self, title: &str) -> VideoAnalysis {
        let lower = title.to_lowercase();

        let procedure = PROCEDURE_MAPPING
            .iter()
            .find(|(key, _)| lower.contains(key));

        let procedure_type = procedure
            .map(|(_, description)| description.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let keywords = procedure
            .map(|(key, _)| vec![key.to_string()])
            .unwrap_or_default();

        let specialty = first_specialty(&lower, TITLE_SPECIALTIES);
        let complexity = if contains_any(&lower, COMPLEX_TERMS) {
            Complexity::Complex
        } else {
            Complexity::Moderate
        };

        VideoAnalysis {
            description: format!("{} - {} specialty", procedure_type, specialty),
            keywords,
            procedure_type,
            specialty,
            complexity,
        }
    }

    pub fn analyze(&self, record: &ContentRecord) -> ItemAnalysis {
        let filename_analysis = self.analyze_filename(record.filename());

        let content_analysis = match record.content_type {
            ContentType::Video => ContentAnalysis::Video(self.analyze_video(&record.title)),
            ContentType::Document | ContentType::Guideline => {
                ContentAnalysis::Filename(filename_analysis.clone())
            }
            ContentType::Image => ContentAnalysis::Empty,
        };

        let keywords: Vec<String> = filename_analysis
            .keywords
            .iter()
            .chain(content_analysis.keywords())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let description = content_analysis
            .description()
            .unwrap_or(&filename_analysis.description)
            .to_string();

        let specialty = content_analysis
            .specialty()
            .unwrap_or(filename_analysis.specialty);

        let priority_score = {
            let urgency_bonus = match filename_analysis.urgency {
                Urgency::Urgent => 5,
                Urgency::Routine => 0,
            };
            let terms_bonus = (filename_analysis.medical_terms.len() as u32 * 2).min(10);
            let specialty_bonus = match content_analysis.specialty() {
                Some(s) if s.is_known() => 3,
                _ => 0,
            };
            (type_score(record.content_type) + urgency_bonus + terms_bonus + specialty_bonus)
                .min(MAX_PRIORITY_SCORE)
        };

        ItemAnalysis {
            id: record.id.clone(),
            title: record.title.clone(),
            content_type: record.content_type,
            file_url: record.file_url.clone(),
            size: record.size,
            last_modified: record.last_modified.clone(),
            filename_analysis,
            content_analysis,
            recommended_category: Category::from_specialty(specialty),
            priority_score,
            keywords,
            description,
        }
    }

    /// Analyzes records in input order; a repeated id keeps its first analysis.
    pub fn analyze_all(
        &self,
        records: &[ContentRecord],
        mut on_item: impl FnMut(&ContentRecord),
    ) -> Vec<ItemAnalysis> {
        let mut seen = HashSet::new();
        records
            .iter()
            .filter(|r| seen.insert(r.id.as_str()))
            .map(|record| {
                on_item(record);
                self.analyze(record)
            })
            .collect()
    }
}

fn describe(
    specialty: Specialty,
    kind: DocumentKind,
    terms: &[String],
    urgency: Urgency,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(phrase) = specialty.phrase() {
        parts.push(phrase.to_string());
    }
    if kind != DocumentKind::Unknown {
        parts.push(format!("{} document", kind));
    }
    if !terms.is_empty() {
        let shown: Vec<&str> = terms.iter().take(3).map(String::as_str).collect();
        parts.push(format!("covering {}", shown.join(", ")));
    }
    if urgency == Urgency::Urgent {
        parts.push("(urgent/critical)".to_string());
    }

    if parts.is_empty() {
        "Medical content document".to_string()
    } else {
        parts.join(" - ")
    }
}

/// Analyses keyed by record id, the shape written to the detailed analysis file.
pub fn analyses_by_id(analyses: &[ItemAnalysis]) -> BTreeMap<&str, &ItemAnalysis> {
    analyses.iter().map(|a| (a.id.as_str(), a)).collect()
}

fn collection_title(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Guideline => "Clinical Guidelines",
        ContentType::Video => "Training Videos",
        ContentType::Document => "Reference Documents",
        ContentType::Image => "Visual Resources",
    }
}

/// Groups analyses by recommended category (first-appearance order), highest
/// priority first, with one collection per content type.
pub fn categorize(analyses: &[ItemAnalysis]) -> Vec<CategoryCard> {
    let groups = analyses.iter().fold(
        Vec::<(Category, Vec<&ItemAnalysis>)>::new(),
        |mut acc, analysis| {
            match acc
                .iter_mut()
                .find(|(category, _)| *category == analysis.recommended_category)
            {
                Some((_, items)) => items.push(analysis),
                None => acc.push((analysis.recommended_category, vec![analysis])),
            }
            acc
        },
    );

    groups
        .into_iter()
        .map(|(category, mut items)| {
            items.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
            category_card(category, &items)
        })
        .collect()
}

fn category_card(category: Category, items: &[&ItemAnalysis]) -> CategoryCard {
    let slug = slugify(category.title());

    let by_type = items.iter().copied().fold(
        Vec::<(ContentType, Vec<&ItemAnalysis>)>::new(),
        |mut acc, item| {
            match acc.iter_mut().find(|(t, _)| *t == item.content_type) {
                Some((_, typed)) => typed.push(item),
                None => acc.push((item.content_type, vec![item])),
            }
            acc
        },
    );

    let collections = by_type
        .into_iter()
        .map(|(content_type, typed)| TypeCollection {
            id: format!("{}-{}", slug, content_type),
            title: collection_title(content_type).to_string(),
            items: typed.iter().take(COLLECTION_ITEMS).map(|a| (*a).clone()).collect(),
            total_count: typed.len(),
            description: format!(
                "Collection of {} {} items for {}",
                typed.len(),
                content_type,
                category
            ),
        })
        .collect();

    CategoryCard {
        id: slug,
        title: category,
        color: category.color().to_string(),
        total_items: items.len(),
        priority_items: items.iter().take(PRIORITY_ITEMS).map(|a| (*a).clone()).collect(),
        collections,
    }
}

pub fn default_medical_terms() -> KeywordSet {
    KeywordSet::from_pairs(&[
        (
            "procedures",
            &[
                "appendectomy",
                "cholecystectomy",
                "hernia repair",
                "ecmo cannulation",
                "ecmo decannulation",
                "central line placement",
                "tracheostomy",
                "gastrostomy tube",
                "intestinal resection",
                "laparoscopic surgery",
                "thoracoscopic procedure",
                "vascular access",
                "trauma surgery",
                "pediatric surgery",
                "neonatal surgery",
                "cardiac surgery",
                "pulmonary surgery",
                "gastrointestinal surgery",
                "urological surgery",
                "orthopedic surgery",
                "neurosurgery",
                "plastic surgery",
            ],
        ),
        (
            "conditions",
            &[
                "congenital diaphragmatic hernia",
                "cdh",
                "tracheoesophageal fistula",
                "tef",
                "necrotizing enterocolitis",
                "nec",
                "respiratory distress",
                "sepsis",
                "shock",
                "hypoxia",
                "bradycardia",
                "tachycardia",
                "hypotension",
                "hypertension",
                "fever",
                "hypothermia",
            ],
        ),
        (
            "medications",
            &[
                "epinephrine",
                "norepinephrine",
                "dopamine",
                "dobutamine",
                "fentanyl",
                "morphine",
                "midazolam",
                "propofol",
                "ketamine",
                "vancomycin",
                "cefazolin",
                "gentamicin",
                "ampicillin",
                "heparin",
                "warfarin",
                "aspirin",
                "acetaminophen",
                "ibuprofen",
            ],
        ),
        (
            "equipment",
            &[
                "ecmo",
                "ventilator",
                "cpap",
                "bipap",
                "oxygen",
                "suction",
                "monitor",
                "defibrillator",
                "pacemaker",
                "catheter",
                "iv",
                "central line",
                "arterial line",
                "chest tube",
                "drain",
            ],
        ),
        (
            "departments",
            &[
                "nicu",
                "picu",
                "icu",
                "emergency",
                "trauma",
                "surgery",
                "cardiology",
                "pulmonology",
                "gastroenterology",
                "urology",
                "orthopedics",
                "neurology",
                "oncology",
                "hematology",
            ],
        ),
        (
            "protocols",
            &[
                "guideline",
                "protocol",
                "policy",
                "procedure",
                "algorithm",
                "pathway",
                "checklist",
                "standard",
                "best practice",
            ],
        ),
    ])
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ContentAnalyzer {
        ContentAnalyzer::default()
    }

    #[test]
    fn filename_terms_kind_and_specialty() {
        let analysis = analyzer().analyze_filename("NICU_Sepsis_Guideline.pdf");

        assert_eq!(analysis.content_type, DocumentKind::Guideline);
        assert_eq!(analysis.specialty, Specialty::Neonatal);
        assert_eq!(analysis.urgency, Urgency::Routine);
        assert!(analysis.medical_terms.contains(&"sepsis".to_string()));
        assert!(analysis.medical_terms.contains(&"nicu".to_string()));
        assert!(analysis.description.starts_with("Neonatal care - guideline document - covering"));
    }

    #[test]
    fn overlapping_terms_are_listed_once() {
        let analysis = analyzer().analyze_filename("icu-icu-protocol.pdf");
        let icu = analysis.medical_terms.iter().filter(|t| *t == "icu").count();
        assert_eq!(icu, 1);
    }

    #[test]
    fn urgent_filename_gets_suffix() {
        let analysis = analyzer().analyze_filename("emergency_airway.pdf");
        assert_eq!(analysis.urgency, Urgency::Urgent);
        assert_eq!(analysis.specialty, Specialty::Emergency);
        assert!(analysis.description.ends_with("(urgent/critical)"));
    }

    #[test]
    fn unremarkable_filename_gets_default_description() {
        let analysis = analyzer().analyze_filename("memo.txt");
        assert!(analysis.medical_terms.is_empty());
        assert_eq!(analysis.description, "Medical content document");
        assert_eq!(analysis.specialty, Specialty::Unknown);
    }

    #[test]
    fn video_procedure_specialty_and_complexity() {
        let analysis = analyzer().analyze_video("ECMO Cannulation - Neck Approach");

        assert_eq!(analysis.procedure_type, "ECMO cannulation procedure");
        assert_eq!(analysis.keywords, vec!["ecmo cannulation"]);
        assert_eq!(analysis.specialty, Specialty::Ecmo);
        assert_eq!(analysis.complexity, Complexity::Complex);
        assert_eq!(analysis.description, "ECMO cannulation procedure - ecmo specialty");
    }

    #[test]
    fn unknown_video_is_moderate() {
        let analysis = analyzer().analyze_video("Grand Rounds");
        assert_eq!(analysis.procedure_type, "unknown");
        assert_eq!(analysis.complexity, Complexity::Moderate);
        assert_eq!(analysis.description, "unknown - unknown specialty");
    }

    #[test]
    fn priority_score_adds_bonuses_and_caps() {
        let record = ContentRecord::new("g", "Critical ECMO sepsis protocol", ContentType::Guideline)
            .with_file_url("docs/critical_ecmo_sepsis_heparin_icu_protocol_guideline.pdf");
        let analysis = analyzer().analyze(&record);

        assert_eq!(analysis.priority_score, MAX_PRIORITY_SCORE);
        assert_eq!(analysis.recommended_category, Category::CriticalCareEcmo);
    }

    #[test]
    fn image_uses_filename_specialty_for_category() {
        let record = ContentRecord::new("i", "Chart", ContentType::Image)
            .with_file_url("img/neonatal_chart.png");
        let analysis = analyzer().analyze(&record);

        assert_eq!(analysis.content_analysis, ContentAnalysis::Empty);
        assert_eq!(analysis.recommended_category, Category::NeonatalNicu);
        assert!(analysis.filename_analysis.medical_terms.is_empty());
        // no content specialty, so only the image base counts
        assert_eq!(analysis.priority_score, 5);
    }

    #[test]
    fn video_category_ignores_filename_specialty() {
        let record = ContentRecord::new("v", "Grand Rounds", ContentType::Video)
            .with_file_url("videos/nicu_rounds.mp4");
        let analysis = analyzer().analyze(&record);
        assert_eq!(analysis.recommended_category, Category::GeneralMedical);
    }

    #[test]
    fn keywords_are_sorted_and_unique() {
        let record = ContentRecord::new("v", "Laparoscopic Appendectomy", ContentType::Video)
            .with_file_url("videos/appendectomy.mp4");
        let analysis = analyzer().analyze(&record);

        assert_eq!(analysis.keywords, vec!["appendectomy"]);
    }

    #[test]
    fn categorize_groups_and_sorts_by_priority() {
        let records = vec![
            ContentRecord::new("a", "Grand Rounds", ContentType::Document)
                .with_file_url("docs/memo.pdf"),
            ContentRecord::new("b", "ECMO Cannulation", ContentType::Video)
                .with_file_url("videos/ecmo.mp4"),
            ContentRecord::new("c", "ECMO Guideline", ContentType::Guideline)
                .with_file_url("docs/ecmo_guideline.pdf"),
        ];
        let analyses = analyzer().analyze_all(&records, |_| {});
        let cards = categorize(&analyses);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, Category::GeneralMedical);
        assert_eq!(cards[1].id, "critical-care-and-ecmo");
        assert_eq!(cards[1].total_items, 2);
        assert_eq!(cards[1].priority_items[0].id, "c");
        assert_eq!(cards[1].collections[0].id, "critical-care-and-ecmo-guideline");
        assert_eq!(cards[1].collections[0].title, "Clinical Guidelines");

        let total: usize = cards.iter().map(|c| c.total_items).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn analyze_all_skips_repeated_ids() {
        let records = vec![
            ContentRecord::new("a", "One", ContentType::Video),
            ContentRecord::new("a", "Two", ContentType::Video),
        ];
        let mut visited = 0;
        let analyses = analyzer().analyze_all(&records, |_| visited += 1);

        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].title, "One");
        assert_eq!(visited, 1);
    }

    #[test]
    fn default_term_table_is_complete() {
        let terms = default_medical_terms();
        assert_eq!(terms.len(), 6);
        assert_eq!(terms.get("protocols").unwrap().keywords.len(), 9);
    }
}
