//! Result types shared by the formatter, the server API and the UI

use serde::{Deserialize, Serialize};

/// Section header agreed on by the prompt template and the formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// "Kondisi Gigi:"
    TeethCondition,
    /// "Kesehatan Gusi:"
    GumHealth,
    /// "Temuan Lainnya:"
    OtherFindings,
    /// "Saran Perawatan:"
    TreatmentAdvice,
    /// "Tips Menjaga Kesehatan Gigi:"
    CareTips,
    /// "Solusi Obat Apotek:"
    PharmacyRemedies,
    /// "Solusi Obat Herbal:"
    HerbalRemedies,
}

impl Category {
    /// All categories in the order the model is asked to produce them
    pub const ALL: [Category; 7] = [
        Category::TeethCondition,
        Category::GumHealth,
        Category::OtherFindings,
        Category::TreatmentAdvice,
        Category::CareTips,
        Category::PharmacyRemedies,
        Category::HerbalRemedies,
    ];

    /// The exact label text, including the trailing colon
    pub fn label(self) -> &'static str {
        match self {
            Category::TeethCondition => "Kondisi Gigi:",
            Category::GumHealth => "Kesehatan Gusi:",
            Category::OtherFindings => "Temuan Lainnya:",
            Category::TreatmentAdvice => "Saran Perawatan:",
            Category::CareTips => "Tips Menjaga Kesehatan Gigi:",
            Category::PharmacyRemedies => "Solusi Obat Apotek:",
            Category::HerbalRemedies => "Solusi Obat Herbal:",
        }
    }

    /// Placeholder shown to the model under this label in the output template
    pub fn template_hint(self) -> &'static str {
        match self {
            Category::TeethCondition => "[deskripsi kondisi gigi]",
            Category::GumHealth => "[deskripsi kesehatan gusi]",
            Category::OtherFindings => "[temuan lain jika ada]",
            Category::TreatmentAdvice => "[saran-saran perawatan]",
            Category::CareTips => "[berikan 3-5 tips menjaga kesehatan gigi]",
            Category::PharmacyRemedies => "[2-3 rekomendasi obat apotek]",
            Category::HerbalRemedies => "[2-3 rekomendasi obat herbal]",
        }
    }

    /// Category whose label starts `line`, if any
    pub fn match_line_start(line: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| line.starts_with(c.label()))
    }
}

/// Clinical terms emphasised wherever they appear in body text
pub const CLINICAL_TERMS: [&str; 5] = ["karies", "plak", "karang gigi", "gingivitis", "periodontitis"];

/// Raw text returned by the remote model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub raw_text: String,
}

/// One line of section body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Line {
    /// List item, stored without its `- ` marker
    Bullet(String),
    /// Anything else
    Text(String),
}

impl Line {
    pub fn text(&self) -> &str {
        match self {
            Line::Bullet(text) | Line::Text(text) => text,
        }
    }
}

/// A labelled block of the assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub category: Category,
    pub lines: Vec<Line>,
}

/// Model output parsed into title, free lines and labelled sections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedResult {
    /// First non-empty line of the response
    pub title: Option<String>,
    /// Lines between the title and the first section header
    pub preamble: Vec<Line>,
    /// Sections in the order they appeared in the response
    pub sections: Vec<Section>,
}

impl FormattedResult {
    /// Section for `category`, if the model produced one
    pub fn section(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.preamble.is_empty() && self.sections.is_empty()
    }

    /// Blank-line separated paragraphs, one per display card
    pub fn paragraphs(&self) -> Vec<String> {
        split_paragraphs(&self.to_markdown())
    }
}

/// Split rendered markdown into its non-empty paragraphs
pub fn split_paragraphs(markdown: &str) -> Vec<String> {
    markdown
        .split("\n\n")
        .map(|p| p.trim_matches('\n'))
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_are_distinct_and_ordered() {
        let labels: Vec<_> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels[0], "Kondisi Gigi:");
        assert_eq!(labels[6], "Solusi Obat Herbal:");
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_match_line_start() {
        assert_eq!(
            Category::match_line_start("Saran Perawatan: sikat gigi"),
            Some(Category::TreatmentAdvice)
        );
        assert_eq!(Category::match_line_start("saran perawatan:"), None);
        assert_eq!(Category::match_line_start(" Kondisi Gigi:"), None);
    }

    #[test]
    fn test_line_serialization() {
        let json = serde_json::to_string(&Line::Bullet("baik".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"bullet","text":"baik"}"#);
    }

    #[test]
    fn test_split_paragraphs_skips_empty() {
        let paragraphs = split_paragraphs("**A**\n\n\n**B**\n- x\n\n");
        assert_eq!(paragraphs, vec!["**A**", "**B**\n- x"]);
    }
}
