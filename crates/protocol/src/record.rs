use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::PageInfo;

/// Container image a result was produced with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BenchmarkRef {
    #[serde(default)]
    pub id: String,
    pub docker_image: String,
    #[serde(default)]
    pub docker_tag: String,
}

impl fmt::Display for BenchmarkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.docker_tag.is_empty() {
            f.write_str(&self.docker_image)
        } else {
            write!(f, "{}:{}", self.docker_image, self.docker_tag)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteRef {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlavorRef {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TagRef {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// One submitted benchmark result as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: String,
    #[serde(default)]
    pub benchmark: BenchmarkRef,
    #[serde(default)]
    pub site: SiteRef,
    #[serde(default)]
    pub flavor: FlavorRef,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    /// Opaque result payload, usually an object.
    #[serde(default)]
    pub json: Value,
    /// Upload timestamp exactly as the backend formats it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded: Option<String>,
}

impl ResultRecord {
    /// A record with only an id and a payload, all references left empty.
    pub fn with_json(id: impl Into<String>, json: Value) -> Self {
        Self {
            id: id.into(),
            benchmark: BenchmarkRef::default(),
            site: SiteRef::default(),
            flavor: FlavorRef::default(),
            tags: Vec::new(),
            json,
            uploaded: None,
        }
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }
}

/// A record tagged with its absolute position across pages.
///
/// Rebuilt on every render pass from the current page; the index lets
/// selection callbacks report which absolute row changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedResultRecord {
    #[serde(flatten)]
    pub record: ResultRecord,
    pub order_index: usize,
}

impl Deref for OrderedResultRecord {
    type Target = ResultRecord;

    fn deref(&self) -> &ResultRecord {
        &self.record
    }
}

/// One page of results together with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<ResultRecord>,
    pub pagination: PageInfo,
}

impl ResultPage {
    /// Wrap a complete, unpaginated result list.
    pub fn single(items: Vec<ResultRecord>) -> Self {
        let pagination = PageInfo::single(items.len());
        Self { items, pagination }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn benchmark_display_includes_tag() {
        let b = BenchmarkRef {
            id: "b1".into(),
            docker_image: "hepix/hepscore".into(),
            docker_tag: "v2".into(),
        };
        assert_eq!(b.to_string(), "hepix/hepscore:v2");

        let untagged = BenchmarkRef {
            docker_tag: String::new(),
            ..b
        };
        assert_eq!(untagged.to_string(), "hepix/hepscore");
    }

    #[test]
    fn record_decodes_with_missing_references() {
        let record: ResultRecord =
            serde_json::from_value(json!({"id": "r1", "json": {"score": 1}})).unwrap();
        assert_eq!(record.id, "r1");
        assert!(record.tags.is_empty());
        assert_eq!(record.json["score"], 1);
    }

    #[test]
    fn ordered_record_serializes_flat() {
        let ordered = OrderedResultRecord {
            record: ResultRecord::with_json("r7", json!({})),
            order_index: 12,
        };
        let value = serde_json::to_value(&ordered).unwrap();
        assert_eq!(value["id"], "r7");
        assert_eq!(value["order_index"], 12);
        assert_eq!(ordered.id, "r7");
    }
}
