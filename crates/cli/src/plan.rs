//! YAML duplication plans.
//!
//! A plan is the file-based equivalent of filling in the duplication form:
//!
//! ```yaml
//! source: 12345
//! quantity: 2
//! fields: [title, images, price]
//! duplicates:
//!   - title: Red Tee
//!     price: 9.99
//!     images:
//!       - file: photos/red.jpg
//!       - url: https://cdn.example.com/red-back.jpg
//!   - title: Blue Tee
//! ```
//!
//! When `fields` is omitted, every field set on at least one duplicate is
//! overridden. Scalars are kept as written, so `price: 10.00` is sent as
//! `"10.00"`.

use std::path::{Path, PathBuf};

use bulk_duplicator_core::{
    TagsInput,
    form::{DuplicateRow, DuplicationForm, FieldSelection, OverrideField},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{uploads::describe_file, workflow::WorkflowError};

/// One gallery entry, written as `{ file: path }` or `{ url: ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanImage {
    /// Local file, relative to the plan's directory unless absolute.
    File(PathBuf),
    /// Already-hosted image.
    Url(String),
}

/// Overrides for a single duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanRow {
    pub title: Option<String>,
    #[serde(alias = "description_html")]
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Option<TagsInput>,
    pub price: Option<String>,
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub images: Vec<PlanImage>,
}

impl PlanRow {
    fn set_fields(&self) -> impl Iterator<Item = OverrideField> + '_ {
        [
            (OverrideField::Title, self.title.is_some()),
            (OverrideField::Images, !self.images.is_empty()),
            (OverrideField::Description, self.description.is_some()),
            (OverrideField::Vendor, self.vendor.is_some()),
            (OverrideField::ProductType, self.product_type.is_some()),
            (OverrideField::Tags, self.tags.is_some()),
            (OverrideField::Price, self.price.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
    }

    fn fill(&self, row: &mut DuplicateRow) {
        row.title = self.title.clone().unwrap_or_default();
        row.description_html = self.description.clone().unwrap_or_default();
        row.vendor = self.vendor.clone().unwrap_or_default();
        row.product_type = self.product_type.clone().unwrap_or_default();
        row.tags = self
            .tags
            .as_ref()
            .map(|tags| tags.normalized().join(", "))
            .unwrap_or_default();
        row.price = self.price.clone().unwrap_or_default();
    }
}

/// A duplication plan loaded from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plan {
    /// Source product, as a numeric id or a product GID.
    pub source: String,
    /// Number of duplicates. Defaults to the number of rows.
    pub quantity: Option<String>,
    pub fields: Option<Vec<OverrideField>>,
    #[serde(default)]
    pub duplicates: Vec<PlanRow>,
}

impl Plan {
    /// Parse a plan from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Yaml`] if the text is not a valid plan.
    pub fn from_yaml(text: &str) -> Result<Self, WorkflowError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a plan file.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Io`] if the file cannot be read, or
    /// [`WorkflowError::Yaml`] if it is not a valid plan.
    pub async fn load(path: &Path) -> Result<Self, WorkflowError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| WorkflowError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml(&text)
    }

    /// Fill a fresh duplication form from the plan.
    ///
    /// `quantity` overrides the plan's own quantity. Rows beyond the
    /// quantity are dropped; missing rows stay blank and inherit everything
    /// from the source product. Local image paths are resolved against
    /// `base_dir` and described from the file system.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Plan`] if the source is blank, or an error
    /// from [`describe_file`] for an unreadable or unsupported image.
    pub async fn into_form(
        self,
        base_dir: &Path,
        quantity: Option<&str>,
    ) -> Result<DuplicationForm, WorkflowError> {
        let source = self.source.trim();
        if source.is_empty() {
            return Err(WorkflowError::Plan("source is required".to_string()));
        }

        let mut form = DuplicationForm::new();
        form.pick_product(source);

        let fields: FieldSelection = match &self.fields {
            Some(fields) => fields.iter().copied().collect(),
            None => self.duplicates.iter().flat_map(PlanRow::set_fields).collect(),
        };
        *form.fields_mut() = fields;

        let raw_quantity = quantity.map_or_else(
            || {
                self.quantity
                    .clone()
                    .unwrap_or_else(|| self.duplicates.len().max(1).to_string())
            },
            str::to_string,
        );
        form.set_quantity(&raw_quantity);

        let quantity = form.quantity();
        if self.duplicates.len() > quantity {
            warn!(
                rows = self.duplicates.len(),
                quantity, "Plan has more duplicates than requested, extra rows are ignored"
            );
        }

        for (index, plan_row) in self.duplicates.iter().take(quantity).enumerate() {
            if let Some(row) = form.row_mut(index) {
                plan_row.fill(row);
            }

            for image in &plan_row.images {
                match image {
                    PlanImage::Url(url) => {
                        form.add_image_url(index, url.clone());
                    }
                    PlanImage::File(path) => {
                        let path = base_dir.join(path);
                        let descriptor = describe_file(&path).await?;
                        debug!(path = %path.display(), size = descriptor.file_size, "Local image");
                        form.add_local_image(index, path, descriptor);
                    }
                }
            }
        }

        Ok(form)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;

    use bulk_duplicator_core::form::ImageEntry;

    use super::*;

    const PLAN: &str = r"
source: 12345
fields: [title, price, tags]
duplicates:
  - title: Red Tee
    price: 9.99
    tags: [summer, sale]
  - title: Blue Tee
    price: '11'
    tags: 'winter, '
";

    #[test]
    fn test_from_yaml() {
        let plan = Plan::from_yaml(PLAN).unwrap();

        assert_eq!(plan.source, "12345");
        assert_eq!(plan.duplicates.len(), 2);
        assert_eq!(plan.duplicates[0].price.as_deref(), Some("9.99"));
        assert_eq!(plan.duplicates[1].price.as_deref(), Some("11"));
    }

    #[test]
    fn test_image_entries_use_map_form() {
        let yaml = r#"
source: "12345"            # or gid://shopify/Product/12345
quantity: 2                # invalid / < 1 → 1
fields: [title, images, price]
duplicates:
  - title: Red edition
    images: [{ file: ./red.jpg }, { url: "https://cdn.example/red-2.jpg" }]
    price: "9.99"
"#;
        let plan = Plan::from_yaml(yaml).unwrap();

        assert_eq!(plan.quantity.as_deref(), Some("2"));
        assert_eq!(
            plan.duplicates[0].images,
            vec![
                PlanImage::File(PathBuf::from("./red.jpg")),
                PlanImage::Url("https://cdn.example/red-2.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn test_scalars_are_kept_as_written() {
        let yaml = "source: 123456789012345678901234\nduplicates:\n  - price: 10.00\n";
        let plan = Plan::from_yaml(yaml).unwrap();

        assert_eq!(plan.source, "123456789012345678901234");
        assert_eq!(plan.duplicates[0].price.as_deref(), Some("10.00"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Plan::from_yaml("source: 1\ncolour: red\n").unwrap_err();
        assert!(matches!(err, WorkflowError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_into_form_builds_request() {
        let form = Plan::from_yaml(PLAN)
            .unwrap()
            .into_form(Path::new("."), None)
            .await
            .unwrap();

        assert_eq!(form.quantity(), 2);
        let request = form.build_request(&HashMap::new()).unwrap();

        assert_eq!(request.source_product_id, "12345");
        assert_eq!(request.duplicates[0].title.as_deref(), Some("Red Tee"));
        assert_eq!(request.duplicates[0].price.as_deref(), Some("9.99"));
        assert_eq!(
            request.duplicates[0].tags,
            Some(TagsInput::Csv("summer, sale".to_string()))
        );
        assert_eq!(request.duplicates[1].price.as_deref(), Some("11"));
        assert_eq!(
            request.duplicates[1].tags.as_ref().unwrap().normalized(),
            vec!["winter"]
        );
    }

    #[tokio::test]
    async fn test_quantity_override_trims_and_pads_rows() {
        let form = Plan::from_yaml(PLAN)
            .unwrap()
            .into_form(Path::new("."), Some("1"))
            .await
            .unwrap();
        assert_eq!(form.quantity(), 1);
        assert_eq!(form.rows()[0].title, "Red Tee");

        let form = Plan::from_yaml(PLAN)
            .unwrap()
            .into_form(Path::new("."), Some("4"))
            .await
            .unwrap();
        assert_eq!(form.quantity(), 4);
        assert_eq!(form.rows()[3], DuplicateRow::default());
    }

    #[tokio::test]
    async fn test_invalid_quantity_counts_as_one() {
        let form = Plan::from_yaml("source: 1\nquantity: none\n")
            .unwrap()
            .into_form(Path::new("."), None)
            .await
            .unwrap();
        assert_eq!(form.quantity(), 1);
    }

    #[tokio::test]
    async fn test_fields_are_inferred_from_rows() {
        let yaml = r"
source: gid://shopify/Product/7
duplicates:
  - vendor: Acme
    images:
      - url: https://cdn.test/a.jpg
";
        let form = Plan::from_yaml(yaml)
            .unwrap()
            .into_form(Path::new("."), None)
            .await
            .unwrap();

        let fields: Vec<_> = form.fields().iter().collect();
        assert_eq!(fields, vec![OverrideField::Images, OverrideField::Vendor]);
        assert_eq!(
            form.rows()[0].images.entries(),
            &[ImageEntry::Url("https://cdn.test/a.jpg".to_string())]
        );
    }

    #[tokio::test]
    async fn test_local_files_resolve_against_base_dir() {
        let dir = std::env::temp_dir().join(format!("dup-plan-{}", std::process::id()));
        tokio::fs::create_dir_all(dir.join("photos")).await.unwrap();
        tokio::fs::write(dir.join("photos/red.jpg"), b"0123456789")
            .await
            .unwrap();

        let yaml = r"
source: 1
fields: [images]
duplicates:
  - images:
      - file: photos/red.jpg
";
        let form = Plan::from_yaml(yaml)
            .unwrap()
            .into_form(&dir, None)
            .await
            .unwrap();

        let pending = form.pending_uploads();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].path, dir.join("photos/red.jpg"));
        assert_eq!(pending[0].descriptor.mime_type, "image/jpeg");
        assert_eq!(pending[0].descriptor.file_size, 10);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let yaml = "source: 1\nduplicates:\n  - images:\n      - file: nowhere.png\n";
        let err = Plan::from_yaml(yaml)
            .unwrap()
            .into_form(Path::new("/nonexistent-plan-dir"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Io { .. }));
    }

    #[tokio::test]
    async fn test_blank_source_is_rejected() {
        let err = Plan::from_yaml("source: ' '\n")
            .unwrap()
            .into_form(Path::new("."), None)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Plan(_)));
    }
}
