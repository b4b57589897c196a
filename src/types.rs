//! Shared types passed between the loader, renderer, and orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One content item, parsed from one data file.
///
/// `slug` names the output file (`<slug>.html`) and `headline` is both the
/// display title and the sort key. Every other key in the data file lands in
/// `fields` untouched and reaches the templates verbatim, so authors can add
/// `pageTitle`, `featuredImage`, ingredient lists, and so on without any
/// change here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub slug: String,
    pub headline: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// The record as a template context object: `slug`, `headline`, then
    /// every other field in file order.
    pub fn to_context(&self) -> Map<String, Value> {
        let mut context = Map::with_capacity(self.fields.len() + 2);
        context.insert("slug".into(), Value::String(self.slug.clone()));
        context.insert("headline".into(), Value::String(self.headline.clone()));
        for (key, value) in &self.fields {
            context.insert(key.clone(), value.clone());
        }
        context
    }

    /// Output file name for this record's page.
    pub fn page_filename(&self) -> String {
        format!("{}.html", self.slug)
    }
}
