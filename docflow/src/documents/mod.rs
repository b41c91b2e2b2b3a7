//! Document domain logic: type normalization and template filling.

pub mod fill;

/// Canonical label for order-type documents.
pub const DOC_TYPE_ORDER: &str = "Заказ";
/// Canonical label for act-type documents.
pub const DOC_TYPE_ACT: &str = "Акт";
/// Canonical label for report-type documents.
pub const DOC_TYPE_REPORT: &str = "Отчет";

/// Normalize a user-supplied document type to its canonical label.
///
/// Trims and lowercases the input, then maps it through a fixed synonym table;
/// unmapped values are capitalized as-is and become their own category.
pub fn normalize_document_type(raw: &str) -> String {
    let cleaned = raw.trim().to_lowercase();
    match cleaned.as_str() {
        "заявка" | "заказ" => DOC_TYPE_ORDER.to_string(),
        "акт" => DOC_TYPE_ACT.to_string(),
        "отчёт" => DOC_TYPE_REPORT.to_string(),
        _ => capitalize(&cleaned),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_map_to_canonical_labels() {
        assert_eq!(normalize_document_type("заявка"), "Заказ");
        assert_eq!(normalize_document_type("заказ"), "Заказ");
        assert_eq!(normalize_document_type("акт"), "Акт");
        assert_eq!(normalize_document_type("отчёт"), "Отчет");
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        assert_eq!(normalize_document_type("  ЗАЯВКА  "), "Заказ");
        assert_eq!(normalize_document_type("Акт"), "Акт");
        assert_eq!(normalize_document_type("\tОТЧЁТ\n"), "Отчет");
    }

    #[test]
    fn test_unmapped_types_are_capitalized() {
        assert_eq!(normalize_document_type("договор"), "Договор");
        assert_eq!(normalize_document_type("ОТЧЕТ"), "Отчет");
        assert_eq!(normalize_document_type("invoice"), "Invoice");
        assert_eq!(normalize_document_type(""), "");
    }
}
