use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerKind, Question, SCALE_MAX, SCALE_MIN};

/// Display-text overrides keyed by `<question_id>` (prompt) or
/// `<question_id>.<option_key>` (option label).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleTable {
    pub locale: String,
    pub entries: BTreeMap<String, String>,
}

impl LocaleTable {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, key: &str, text: &str) -> Self {
        self.entries.insert(key.to_string(), text.to_string());
        self
    }

    pub fn prompt<'a>(&'a self, question: &'a Question) -> &'a str {
        self.entries
            .get(&question.id)
            .map(String::as_str)
            .unwrap_or(&question.prompt)
    }

    pub fn option_label<'a>(&'a self, question: &Question, key: &str, fallback: &'a str) -> &'a str {
        self.entries
            .get(&format!("{}.{}", question.id, key))
            .map(String::as_str)
            .unwrap_or(fallback)
    }

    pub fn hindi() -> Self {
        Self::new("hi")
            .with_entry("work_environment", "आप किस तरह का कार्य वातावरण पसंद करते हैं?")
            .with_entry("work_environment.people_teams", "लोगों और टीमों के साथ काम करना")
            .with_entry("work_environment.data_analysis", "डेटा और विश्लेषण के साथ काम करना")
            .with_entry("work_environment.hands_on", "हाथों से किए जाने वाले कामों के साथ काम करना")
            .with_entry(
                "work_environment.independent_creative",
                "स्वतंत्र और रचनात्मक रूप से काम करना",
            )
            .with_entry("work_style", "आपको कौन सी कार्य शैली सबसे अधिक पसंद है?")
            .with_entry("work_style.creative_artistic", "रचनात्मक और कलात्मक काम")
            .with_entry("work_style.analytical_problem_solving", "विश्लेषणात्मक और समस्या-समाधान वाला काम")
            .with_entry("work_style.structured_organized", "व्यवस्थित और संगठित काम")
            .with_entry("work_style.flexible_varied", "लचीला और विविध काम")
            .with_entry("tech_focus", "किस तरह का विश्लेषणात्मक काम आपको सबसे ज़्यादा उत्साहित करता है?")
            .with_entry("tech_focus.build_software", "ऐप्स और सॉफ़्टवेयर उत्पाद बनाना")
            .with_entry("tech_focus.find_insights", "डेटा में पैटर्न और जानकारियाँ खोजना")
            .with_entry("tech_focus.diagnose_problems", "वास्तविक दुनिया की समस्याओं का निदान और समाधान करना")
            .with_entry("creative_medium", "आप किस रचनात्मक माध्यम में काम करना चाहेंगे?")
            .with_entry("creative_medium.visual_design", "विज़ुअल डिज़ाइन, चित्रण और ब्रांडिंग")
            .with_entry("creative_medium.video_storytelling", "वीडियो, कहानी कहना और ऑनलाइन सामग्री")
            .with_entry("creative_medium.campaigns_copy", "अभियान, कॉपीराइटिंग और सोशल मीडिया")
            .with_entry("technology_interest", "आपकी तकनीक में कितनी रुचि है?")
            .with_entry("arts_interest", "आपकी कला और रचनात्मकता में कितनी रुचि है?")
            .with_entry("business_interest", "आपकी व्यापार और वित्त में कितनी रुचि है?")
            .with_entry("numbers_comfort", "आप हिसाब-किताब, कर और संख्याओं के साथ कितने सहज हैं?")
            .with_entry("healthcare_interest", "आपकी स्वास्थ्य सेवा और चिकित्सा में कितनी रुचि है?")
            .with_entry("education_interest", "आपकी शिक्षा और अध्यापन में कितनी रुचि है?")
            .with_entry("public_service_interest", "आपकी लोक सेवा और प्रशासन में कितनी रुचि है?")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleView {
    pub min: u8,
    pub max: u8,
}

/// Presentation-ready rendering of a question for a given locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    pub kind: AnswerKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleView>,
    pub category: String,
    pub conditional: bool,
}

impl QuestionView {
    pub fn localized(question: &Question, locale: Option<&LocaleTable>) -> Self {
        let prompt = match locale {
            Some(table) => table.prompt(question).to_string(),
            None => question.prompt.clone(),
        };

        let options = question
            .options
            .iter()
            .map(|option| OptionView {
                key: option.key.clone(),
                label: match locale {
                    Some(table) => table
                        .option_label(question, &option.key, &option.label)
                        .to_string(),
                    None => option.label.clone(),
                },
            })
            .collect();

        let scale = match question.kind {
            AnswerKind::RatedScale => Some(ScaleView {
                min: SCALE_MIN,
                max: SCALE_MAX,
            }),
            AnswerKind::SingleChoice => None,
        };

        Self {
            id: question.id.clone(),
            prompt,
            kind: question.kind,
            options,
            scale,
            category: question.category.clone(),
            conditional: question.branch.is_some(),
        }
    }
}
