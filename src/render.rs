//! Page composition: item/listing body wrapped in the shell template.
//!
//! Shell context layering, lowest to highest precedence:
//!
//! ```text
//! record page:   [defaults] < record fields < { body, recipes }
//! listing page:  [defaults] < { pageTitle: listing_title, body, recipes }
//! ```
//!
//! A record may therefore set its own `pageTitle` or `featuredImage` and have
//! it win over the site defaults, but it can never replace `body` or the
//! `recipes` list. The listing page's title is always the configured
//! constant.

use serde_json::{Map, Value};

use crate::templates::{TemplateError, TemplateKind, Templates};
use crate::types::Record;

/// Context key holding the rendered item/listing body.
pub const BODY_KEY: &str = "body";
/// Context key holding the full, sorted record list.
pub const COLLECTION_KEY: &str = "recipes";
/// Context key the shell uses for `<title>`.
pub const TITLE_KEY: &str = "pageTitle";

/// Renders pages for one build. The collection is serialized once up front
/// and shared by every page.
pub struct PageRenderer<'a> {
    templates: &'a Templates,
    defaults: Map<String, Value>,
    collection: Value,
    listing_title: String,
}

impl<'a> PageRenderer<'a> {
    pub fn new(
        templates: &'a Templates,
        records: &[Record],
        defaults: Map<String, Value>,
        listing_title: &str,
    ) -> Self {
        let collection = Value::Array(
            records
                .iter()
                .map(|r| Value::Object(r.to_context()))
                .collect(),
        );
        Self {
            templates,
            defaults,
            collection,
            listing_title: listing_title.to_string(),
        }
    }

    /// Render the full page for one record.
    pub fn record_page(&self, record: &Record) -> Result<String, TemplateError> {
        let record_context = record.to_context();
        let body = self
            .templates
            .render(TemplateKind::Item, &record_context)?;

        let mut context = self.defaults.clone();
        context.extend(record_context);
        self.wrap(context, body)
    }

    /// Render `index.html`.
    pub fn listing_page(&self) -> Result<String, TemplateError> {
        let body = self
            .templates
            .render(TemplateKind::Listing, &Map::new())?;

        let mut context = self.defaults.clone();
        context.insert(
            TITLE_KEY.to_string(),
            Value::String(self.listing_title.clone()),
        );
        self.wrap(context, body)
    }

    /// Layer `body` and the collection on top of `context` and render the
    /// shell.
    fn wrap(&self, mut context: Map<String, Value>, body: String) -> Result<String, TemplateError> {
        context.insert(BODY_KEY.to_string(), Value::String(body));
        context.insert(COLLECTION_KEY.to_string(), self.collection.clone());
        self.templates.render(TemplateKind::Shell, &context)
    }
}
