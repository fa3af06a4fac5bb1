//! Output formatting for products, product detail, and navigation results.

use crate::backend::models::{ProductDetail, ProductSummary};
use crate::config::OutputFormat;
use crate::workflow::router::Navigation;

/// Formats results according to the configured output format.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the de-duplicated product list.
    pub fn format_products(&self, products: &[ProductSummary]) -> String {
        if products.is_empty() {
            return "No products found.".to_string();
        }

        match self.format {
            OutputFormat::Table => Self::products_table(products),
            OutputFormat::Json => {
                serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Markdown => Self::products_markdown(products),
            OutputFormat::Csv => Self::products_csv(products),
        }
    }

    /// Formats one product record with its reviews.
    pub fn format_detail(&self, detail: &ProductDetail) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(detail).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Markdown => Self::detail_markdown(detail),
            OutputFormat::Table | OutputFormat::Csv => Self::detail_text(detail),
        }
    }

    /// Formats a terminal navigation decision.
    pub fn format_navigation(&self, navigation: &Navigation) -> String {
        if self.format == OutputFormat::Json {
            let value = match navigation {
                Navigation::ProcessingSuccess { url, product_id, .. } => serde_json::json!({
                    "status": "success",
                    "destination": navigation.path(),
                    "url": url.as_str(),
                    "product_id": product_id,
                }),
                Navigation::ProcessingFailed { url, error } => serde_json::json!({
                    "status": "failed",
                    "destination": navigation.path(),
                    "url": url.as_ref().map(|u| u.as_str()),
                    "error": error,
                }),
            };
            return serde_json::to_string_pretty(&value).unwrap_or_default();
        }

        match navigation {
            Navigation::ProcessingSuccess { product_id, .. } => format!(
                "Product analysis complete.\n  Product ID: {}\n  Destination: {}",
                product_id,
                navigation.path()
            ),
            Navigation::ProcessingFailed { error, .. } => format!(
                "Product processing failed: {}\n  Destination: {}",
                error,
                navigation.path()
            ),
        }
    }

    fn products_table(products: &[ProductSummary]) -> String {
        let mut out = String::new();
        out.push_str(&format!("{:<26} {:<40} {:<24}\n", "ID", "NAME", "CREATED"));
        out.push_str(&format!("{:-<26} {:-<40} {:-<24}\n", "", "", ""));

        for product in products {
            let created = product
                .created_time
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{:<26} {:<40} {:<24}\n",
                truncate(&product.product_id, 24),
                truncate(&product.product_name, 38),
                created
            ));
        }

        out.push_str(&format!("\n{} product(s)", products.len()));
        out
    }

    fn products_markdown(products: &[ProductSummary]) -> String {
        let mut out = String::from("| ID | Name | Created |\n|---|---|---|\n");
        for product in products {
            let created = product
                .created_time
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                product.product_id, product.product_name, created
            ));
        }
        out
    }

    fn products_csv(products: &[ProductSummary]) -> String {
        let mut out = String::from("product_id,product_name,created_time,product_image_url\n");
        for product in products {
            let created = product
                .created_time
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_default();
            out.push_str(&format!(
                "{},{},{},{}\n",
                csv_field(&product.product_id),
                csv_field(&product.product_name),
                csv_field(&created),
                csv_field(product.product_image_url.as_deref().unwrap_or(""))
            ));
        }
        out
    }

    fn detail_text(detail: &ProductDetail) -> String {
        let mut out = String::new();
        let info = detail.product_info.clone().unwrap_or_default();

        let name = if info.product_name.trim().is_empty() {
            "Unnamed Product"
        } else {
            info.product_name.as_str()
        };
        out.push_str(&format!("Product: {}\n", name));
        out.push_str(&format!("ID:      {}\n", detail.product_id));
        if let Some(url) = &detail.product_url {
            out.push_str(&format!("URL:     {}\n", url));
        }
        if !info.product_description.trim().is_empty() {
            out.push_str(&format!("\n{}\n", info.product_description));
        }
        if !info.ingredients.is_empty() {
            let names: Vec<&str> = info.ingredients.iter().map(|i| i.name()).collect();
            out.push_str(&format!("\nIngredients: {}\n", names.join(", ")));
        }

        if detail.enhanced_generated_reviews.is_empty() {
            out.push_str("\nNo generated reviews yet.\n");
        } else {
            out.push_str(&format!(
                "\nGenerated reviews ({}):\n",
                detail.enhanced_generated_reviews.len()
            ));
            for review in &detail.enhanced_generated_reviews {
                let disposition = detail.review_disposition(&review.review_id);
                out.push_str(&format!(
                    "  [{}] {} - {}\n",
                    disposition,
                    review.review_id,
                    truncate(&review.review_title, 60)
                ));
            }
        }

        out
    }

    fn detail_markdown(detail: &ProductDetail) -> String {
        let info = detail.product_info.clone().unwrap_or_default();
        let name = if info.product_name.trim().is_empty() {
            "Unnamed Product"
        } else {
            info.product_name.as_str()
        };

        let mut out = format!("## {}\n\n**Product ID:** {}\n", name, detail.product_id);
        if let Some(url) = &detail.product_url {
            out.push_str(&format!("**URL:** {}\n", url));
        }
        if !info.product_description.trim().is_empty() {
            out.push_str(&format!("\n{}\n", info.product_description));
        }
        if !info.ingredients.is_empty() {
            out.push_str("\n**Ingredients:**\n");
            for ingredient in &info.ingredients {
                out.push_str(&format!("- {}\n", ingredient.name()));
            }
        }
        if !detail.enhanced_generated_reviews.is_empty() {
            out.push_str("\n### Reviews\n");
            for review in &detail.enhanced_generated_reviews {
                out.push_str(&format!(
                    "- **{}** ({}) - {}\n",
                    review.review_title,
                    detail.review_disposition(&review.review_id),
                    review.review_id
                ));
            }
        }
        out
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::{CreatedTime, GeneratedReview, ProductInfo};
    use crate::workflow::normalize::normalize;
    use std::time::Duration;

    fn make_products() -> Vec<ProductSummary> {
        vec![
            ProductSummary {
                product_id: "p1".to_string(),
                product_name: "Widget".to_string(),
                product_image_url: Some("https://example.com/w.jpg".to_string()),
                created_time: Some(CreatedTime::Millis(1000.0)),
            },
            ProductSummary {
                product_id: "p2".to_string(),
                product_name: "Gadget, Deluxe".to_string(),
                product_image_url: None,
                created_time: None,
            },
        ]
    }

    #[test]
    fn test_empty_products_message() {
        let formatter = Formatter::new(OutputFormat::Table);
        assert_eq!(formatter.format_products(&[]), "No products found.");
    }

    #[test]
    fn test_products_table() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_products(&make_products());
        assert!(output.contains("p1"));
        assert!(output.contains("Widget"));
        assert!(output.contains("2 product(s)"));
    }

    #[test]
    fn test_products_json_parses_back() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_products(&make_products());
        let parsed: Vec<ProductSummary> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_products_markdown() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let output = formatter.format_products(&make_products());
        assert!(output.starts_with("| ID | Name | Created |"));
        assert!(output.contains("| p1 | Widget | 1000 |"));
    }

    #[test]
    fn test_products_csv_quotes_commas() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let output = formatter.format_products(&make_products());
        assert!(output.starts_with("product_id,product_name,created_time,product_image_url"));
        assert!(output.contains("\"Gadget, Deluxe\""));
    }

    #[test]
    fn test_detail_text_lists_reviews_with_disposition() {
        let detail = ProductDetail {
            product_id: "abc".to_string(),
            product_info: Some(ProductInfo {
                product_name: "Widget".to_string(),
                ..Default::default()
            }),
            enhanced_generated_reviews: vec![
                GeneratedReview {
                    review_id: "r1".to_string(),
                    review_title: "Solid".to_string(),
                    ..Default::default()
                },
                GeneratedReview {
                    review_id: "r2".to_string(),
                    review_title: "Meh".to_string(),
                    ..Default::default()
                },
            ],
            accepted_review_ids: vec!["r1".to_string()],
            ..Default::default()
        };

        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_detail(&detail);
        assert!(output.contains("Product: Widget"));
        assert!(output.contains("[accepted] r1"));
        assert!(output.contains("[pending] r2"));
    }

    #[test]
    fn test_detail_without_reviews() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_detail(&ProductDetail::default());
        assert!(output.contains("Unnamed Product"));
        assert!(output.contains("No generated reviews yet."));
    }

    #[test]
    fn test_navigation_success_text() {
        let nav = Navigation::ProcessingSuccess {
            url: normalize("https://example.com/p").unwrap(),
            product_id: "abc".to_string(),
            delay: Duration::from_secs(2),
        };

        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_navigation(&nav);
        assert!(output.contains("Product ID: abc"));
        assert!(output.contains("/processing-success?"));
    }

    #[test]
    fn test_navigation_failed_json() {
        let nav = Navigation::ProcessingFailed {
            url: Some(normalize("https://example.com/p").unwrap()),
            error: "oops".to_string(),
        };

        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_navigation(&nav);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "oops");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-10", 10), "exactly-10");
        assert_eq!(truncate("a-very-long-product-name", 10), "a-very-...");
    }
}
