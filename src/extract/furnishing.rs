use crate::config::LocaleKeywords;
use crate::document::ListingDocument;

/// Furnishing status text and the two literals found in it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Furnishing {
    pub status: Option<String>,
    pub furnished: bool,
    pub unfurnished: bool,
}

pub struct FurnishingClassifier {
    label: String,
    furnished: String,
    unfurnished: String,
}

impl FurnishingClassifier {
    pub fn new(locale: &LocaleKeywords) -> Self {
        Self {
            label: locale.furnishing_label.clone(),
            furnished: locale.furnished.to_lowercase(),
            unfurnished: locale.unfurnished.to_lowercase(),
        }
    }

    /// The cell mentioning the furnishing keyword, plus its value cell when it is only a label
    pub fn status(&self, doc: &dyn ListingDocument) -> Option<String> {
        let parts: Vec<String> = [doc.cell_containing(&self.label), doc.label_value(&self.label)]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn classify(&self, status: Option<String>) -> Furnishing {
        let lowered = status.as_deref().map(str::to_lowercase).unwrap_or_default();

        Furnishing {
            furnished: lowered.contains(&self.furnished),
            unfurnished: lowered.contains(&self.unfurnished),
            status,
        }
    }

    pub fn extract(&self, doc: &dyn ListingDocument) -> Furnishing {
        self.classify(self.status(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlListing;
    use scraper::Html;
    use url::Url;

    fn classifier() -> FurnishingClassifier {
        FurnishingClassifier {
            label: "mēbel".to_string(),
            furnished: "mēbelētu".to_string(),
            unfurnished: "bez mēbelēm".to_string(),
        }
    }

    #[test]
    fn test_furnished_cell() {
        let html = Html::parse_document("<table><tr><td>Izīrē</td><td>Mēbelētu</td></tr></table>");
        let base = Url::parse("https://www.ss.lv/").unwrap();
        let furnishing = classifier().extract(&HtmlListing::from_document(&html, base));
        assert!(furnishing.furnished);
        assert!(!furnishing.unfurnished);
    }

    #[test]
    fn test_labelled_status() {
        let html = Html::parse_document("<table><tr><td>Mēbeles:</td><td>Bez mēbelēm</td></tr></table>");
        let base = Url::parse("https://www.ss.lv/").unwrap();
        let furnishing = classifier().extract(&HtmlListing::from_document(&html, base));
        assert_eq!(furnishing.status.as_deref(), Some("Mēbeles: Bez mēbelēm"));
        assert!(furnishing.unfurnished);
        assert!(!furnishing.furnished);
    }

    #[test]
    fn test_both_literals_are_reported() {
        let furnishing = classifier().classify(Some("Bez mēbelēm vai mēbelētu pēc vienošanās".to_string()));
        assert!(furnishing.furnished);
        assert!(furnishing.unfurnished);
    }

    #[test]
    fn test_absent_status() {
        assert_eq!(classifier().classify(None), Furnishing::default());
    }
}
