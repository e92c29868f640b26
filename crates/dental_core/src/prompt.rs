//! Prompt sent alongside the photo

use crate::types::Category;

const INSTRUCTION: &str =
    "Analisis gambar gigi ini dan berikan penilaian terinci tentang kesehatan mulut.";

const FORMAT_INTRO: &str =
    "Berikan jawaban dalam format berikut tanpa menggunakan simbol pagar atau bintang:";

const TITLE: &str = "Hasil Analisis Gigi";

const LANGUAGE: &str = "Berikan jawaban dalam bahasa Indonesia.";

/// Build the full prompt: instruction, optional complaint, output template
pub fn build_prompt(complaint: Option<&str>) -> String {
    let mut prompt = String::from(INSTRUCTION);

    if let Some(complaint) = complaint.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!(" Pasien memiliki keluhan: \"{complaint}\"."));
    }

    prompt.push(' ');
    prompt.push_str(FORMAT_INTRO);
    prompt.push_str("\n\n");
    prompt.push_str(TITLE);
    prompt.push_str("\n\n");
    for category in Category::ALL {
        prompt.push_str(category.label());
        prompt.push_str("\n- ");
        prompt.push_str(category.template_hint());
        prompt.push_str("\n\n");
    }
    prompt.push_str(LANGUAGE);

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_complaint() {
        let prompt = build_prompt(None);
        assert!(prompt.starts_with(INSTRUCTION));
        assert!(!prompt.contains("keluhan"));
        assert!(prompt.ends_with(LANGUAGE));
    }

    #[test]
    fn test_blank_complaint_is_ignored() {
        assert_eq!(build_prompt(Some("   \n")), build_prompt(None));
    }

    #[test]
    fn test_complaint_is_quoted() {
        let prompt = build_prompt(Some(" gigi ngilu saat minum dingin "));
        assert!(prompt.contains("Pasien memiliki keluhan: \"gigi ngilu saat minum dingin\"."));
    }

    #[test]
    fn test_template_names_every_category_in_order() {
        let prompt = build_prompt(None);
        let mut last = 0;
        for category in Category::ALL {
            let at = prompt.find(&format!("\n{}\n", category.label())).unwrap();
            assert!(at > last);
            last = at;
        }
    }
}
