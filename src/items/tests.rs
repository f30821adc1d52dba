//! Item Builder Tests
//!
//! ## Test Scopes
//! - **Fan-out shape**: item count per kind is `1 + k + m + j`.
//! - **Keys**: composite key formats and author/keyword normalization.
//! - **Idempotence**: identical input gives identical items.
//! - **Payload**: denormalized fields on every item, abstract only on the paper item.

#[cfg(test)]
mod tests {
    use crate::document::types::Paper;
    use crate::items::builder::build_items;
    use crate::items::keys::*;
    use crate::items::types::{ItemKind, KindCounts};
    use crate::keywords::extractor::{KeywordConfig, KeywordExtractor};
    use serde_json::Value;

    fn paper(id: &str, categories: &[&str], authors: &[&str], abstract_text: &str) -> Paper {
        Paper {
            arxiv_id: id.to_string(),
            title: format!("Title of {}", id),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            abstract_text: abstract_text.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            published: "2024-03-01".to_string(),
        }
    }

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    // ============================================================
    // FAN-OUT SHAPE
    // ============================================================

    #[test]
    fn test_fan_out_count_formula() {
        let doc = paper("P1", &["cs.AI", "cs.LG"], &["Ada Lovelace", "Alan Turing"], "x");
        let fan_out = build_items(&doc, &keywords(&["graph", "neural", "learning"]));

        assert_eq!(fan_out.items.len(), 1 + 2 + 2 + 3);
        assert_eq!(
            fan_out.counts,
            KindCounts {
                paper_id: 1,
                category: 2,
                author: 2,
                keyword: 3
            }
        );
        assert_eq!(fan_out.counts.total(), fan_out.items.len());
    }

    #[test]
    fn test_bare_document_yields_only_paper_item() {
        let fan_out = build_items(&paper("P0", &[], &[], ""), &[]);

        assert_eq!(fan_out.items.len(), 1);
        assert_eq!(fan_out.items[0].kind, ItemKind::PaperId);
        assert_eq!(fan_out.counts.paper_id, 1);
    }

    #[test]
    fn test_item_order_follows_kinds() {
        let doc = paper("P1", &["cs.AI"], &["Ada"], "");
        let kinds: Vec<ItemKind> = build_items(&doc, &keywords(&["graph"]))
            .items
            .iter()
            .map(|item| item.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                ItemKind::PaperId,
                ItemKind::Category,
                ItemKind::Author,
                ItemKind::Keyword
            ]
        );
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let doc = paper("P1", &["cs.AI", "cs.AI"], &["Jane Doe", "jane   DOE"], "");
        let fan_out = build_items(&doc, &keywords(&["graph", "Graph"]));

        assert_eq!(fan_out.counts.category, 1);
        assert_eq!(fan_out.counts.author, 1);
        assert_eq!(fan_out.counts.keyword, 1);
    }

    // ============================================================
    // KEYS
    // ============================================================

    #[test]
    fn test_paper_item_keys() {
        let fan_out = build_items(&paper("2401.00001", &[], &[], "abs"), &[]);
        let item = &fan_out.items[0];

        assert_eq!(item.pk, "PAPER#2401.00001");
        assert_eq!(item.sk, "PAPER");
        let gsi2 = item.gsi2.as_ref().unwrap();
        assert_eq!(gsi2.partition, "PAPER#2401.00001");
        assert_eq!(gsi2.sort, "2024-03-01");
        assert!(item.gsi1.is_none() && item.gsi3.is_none());
    }

    #[test]
    fn test_category_author_keyword_keys() {
        let doc = paper("P1", &["cs.AI"], &["  Ada   Lovelace "], "");
        let fan_out = build_items(&doc, &keywords(&["graph"]));

        let category = &fan_out.items[1];
        assert_eq!(category.pk, "CATEGORY#cs.AI");
        assert_eq!(category.sk, "2024-03-01#P1");
        assert!(category.gsi1.is_none() && category.gsi2.is_none() && category.gsi3.is_none());

        let author = &fan_out.items[2];
        assert_eq!(author.pk, "AUTHOR#ada lovelace");
        assert_eq!(author.gsi1.as_ref().unwrap().partition, "AUTHOR#ada lovelace");
        assert_eq!(author.gsi1.as_ref().unwrap().sort, "2024-03-01#P1");

        let keyword = &fan_out.items[3];
        assert_eq!(keyword.pk, "KEYWORD#graph");
        assert_eq!(keyword.gsi3.as_ref().unwrap().sort, "2024-03-01#P1");
    }

    #[test]
    fn test_date_range_bounds_cover_end_date() {
        let (lo, hi) = date_range_bounds("2024-01-01", "2024-01-31");

        assert!(lo.as_str() <= "2024-01-01#0001");
        assert!("2024-01-31#zzzz.9999" < hi.as_str());
        assert!("2024-01-31#~1" < hi.as_str());
        assert!("2024-01-31#é1" < hi.as_str());
        assert!("2024-01-31#\u{10FFFF}" < hi.as_str());
        assert!(hi.as_str() < "2024-02-01#0001");
        assert!("2023-12-31#9999" < lo.as_str());
    }

    // ============================================================
    // IDEMPOTENCE
    // ============================================================

    #[test]
    fn test_build_is_deterministic() {
        let doc = paper("P1", &["cs.AI", "cs.LG"], &["Ada"], "graph neural graph");
        let extractor = KeywordExtractor::default();

        let first = build_items(&doc, &extractor.extract(&doc.abstract_text));
        let second = build_items(&doc, &extractor.extract(&doc.abstract_text));

        assert_eq!(first, second);
        let first_rows: Vec<_> = first.items.iter().map(|i| i.to_item()).collect();
        let second_rows: Vec<_> = second.items.iter().map(|i| i.to_item()).collect();
        assert_eq!(
            serde_json::to_string(&first_rows).unwrap(),
            serde_json::to_string(&second_rows).unwrap()
        );
    }

    // ============================================================
    // PAYLOAD
    // ============================================================

    #[test]
    fn test_every_item_carries_common_payload() {
        let doc = paper("P1", &["cs.AI"], &["Ada"], "graph");
        for item in build_items(&doc, &keywords(&["graph"])).items {
            let row = item.to_item();
            assert_eq!(row["arxiv_id"], Value::from("P1"));
            assert_eq!(row["title"], Value::from("Title of P1"));
            assert_eq!(row["authors"], serde_json::json!(["Ada"]));
            assert_eq!(row["categories"], serde_json::json!(["cs.AI"]));
            assert_eq!(row["published"], Value::from("2024-03-01"));
        }
    }

    #[test]
    fn test_abstract_only_on_paper_item() {
        let doc = paper("P1", &["cs.AI"], &["Ada"], "the abstract");
        let rows: Vec<_> = build_items(&doc, &keywords(&["abstract"]))
            .items
            .iter()
            .map(|item| item.to_item())
            .collect();

        assert_eq!(rows[0]["abstract"], Value::from("the abstract"));
        assert!(rows[1..].iter().all(|row| !row.contains_key("abstract")));
    }

    #[test]
    fn test_sparse_index_attributes() {
        let doc = paper("P1", &["cs.AI"], &["Ada"], "");
        let rows: Vec<_> = build_items(&doc, &keywords(&["graph"]))
            .items
            .iter()
            .map(|item| item.to_item())
            .collect();

        assert!(rows[0].contains_key(ATTR_GSI2PK));
        assert!(!rows[1].contains_key(ATTR_GSI1PK));
        assert!(rows[2].contains_key(ATTR_GSI1PK) && rows[2].contains_key(ATTR_GSI1SK));
        assert!(rows[3].contains_key(ATTR_GSI3PK) && rows[3].contains_key(ATTR_GSI3SK));
    }

    // ============================================================
    // SCENARIO
    // ============================================================

    #[test]
    fn test_reference_document_fan_out() {
        let doc = paper(
            "P1",
            &["cs.AI", "cs.LG"],
            &["Ada Lovelace"],
            "graph neural networks for graph learning",
        );
        let extractor = KeywordExtractor::new(KeywordConfig::default().with_max_keywords(3));
        let fan_out = build_items(&doc, &extractor.extract(&doc.abstract_text));

        assert_eq!(fan_out.counts.paper_id, 1);
        assert_eq!(fan_out.counts.category, 2);
        assert_eq!(fan_out.counts.author, 1);
        assert!(fan_out.counts.keyword <= 3);
        assert!(fan_out.items.len() <= 7);
    }
}
