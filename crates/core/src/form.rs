//! The duplication form edited by the workflow controller.
//!
//! Holds everything the merchant has entered before submitting: the picked
//! source product, which fields to override, and one [`DuplicateRow`] per
//! requested copy. Each row keeps its images as a single ordered list of
//! [`ImageEntry`] values, so reordering and removal work on list positions
//! and local files and remote URLs share one ordering.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    api::BulkDuplicateRequest,
    duplicate::DuplicateSpec,
    types::TagsInput,
    upload::FileDescriptor,
};

/// Errors raised while turning the form into a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No source product has been picked.
    #[error("Pick a product to duplicate first")]
    NoProductSelected,

    /// A local image has no uploaded URL yet.
    #[error("Image {key} in duplicate {row} has not been uploaded")]
    MissingUpload {
        /// 1-based duplicate number.
        row: usize,
        key: ImageKey,
    },
}

/// A field the merchant may override per duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideField {
    Title,
    Images,
    #[serde(alias = "description_html")]
    Description,
    Vendor,
    ProductType,
    Tags,
    Price,
}

/// The set of fields selected for override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSelection(BTreeSet<OverrideField>);

impl FieldSelection {
    /// Select a field.
    pub fn select(&mut self, field: OverrideField) {
        self.0.insert(field);
    }

    /// Deselect a field.
    pub fn deselect(&mut self, field: OverrideField) {
        self.0.remove(&field);
    }

    /// Whether a field is selected.
    #[must_use]
    pub fn contains(&self, field: OverrideField) -> bool {
        self.0.contains(&field)
    }

    /// Selected fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = OverrideField> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<OverrideField> for FieldSelection {
    fn from_iter<I: IntoIterator<Item = OverrideField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Most duplicates a single form may request.
pub const MAX_QUANTITY: usize = 250;

/// Parse a quantity entered by the merchant.
///
/// Anything that is not an integer in `1..=MAX_QUANTITY` counts as 1.
#[must_use]
pub fn parse_quantity(raw: &str) -> usize {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_QUANTITY).contains(n))
        .unwrap_or(1)
}

/// Stable handle for a local image, independent of its list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageKey(u64);

impl ImageKey {
    /// Create a key from a raw value.
    #[must_use]
    pub const fn new(key: u64) -> Self {
        Self(key)
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A local file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub key: ImageKey,
    pub path: PathBuf,
    pub descriptor: FileDescriptor,
}

/// One image slot in a duplicate's gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEntry {
    /// A local file, replaced by its resource URL after upload.
    File(LocalImage),
    /// An already-hosted image.
    Url(String),
}

/// Ordered gallery of a single duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageList {
    entries: Vec<ImageEntry>,
}

impl ImageList {
    /// Append an entry at the end.
    pub fn push(&mut self, entry: ImageEntry) {
        self.entries.push(entry);
    }

    /// Move the entry at `from` so it ends up at `to`.
    ///
    /// Returns `false` (and leaves the list untouched) if either position is
    /// out of range.
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() || to >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        true
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<ImageEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    #[must_use]
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Local files in gallery order.
    pub fn files(&self) -> impl Iterator<Item = &LocalImage> {
        self.entries.iter().filter_map(|entry| match entry {
            ImageEntry::File(image) => Some(image),
            ImageEntry::Url(_) => None,
        })
    }

    /// Resolve the gallery to URLs, substituting uploaded resource URLs for
    /// local files.
    ///
    /// # Errors
    ///
    /// Returns the key of the first local file missing from `uploaded`.
    pub fn resolve(&self, uploaded: &HashMap<ImageKey, String>) -> Result<Vec<String>, ImageKey> {
        self.entries
            .iter()
            .map(|entry| match entry {
                ImageEntry::Url(url) => Ok(url.clone()),
                ImageEntry::File(image) => uploaded.get(&image.key).cloned().ok_or(image.key),
            })
            .collect()
    }
}

/// Per-duplicate override editor state. Text fields hold raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateRow {
    pub title: String,
    pub images: ImageList,
    pub description_html: String,
    pub vendor: String,
    pub product_type: String,
    /// Comma-separated tags.
    pub tags: String,
    pub price: String,
}

/// The whole duplication form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicationForm {
    source_product_id: Option<String>,
    fields: FieldSelection,
    rows: Vec<DuplicateRow>,
    next_image_key: u64,
}

impl Default for DuplicationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DuplicationForm {
    /// An empty form with a single duplicate row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source_product_id: None,
            fields: FieldSelection::default(),
            rows: vec![DuplicateRow::default()],
            next_image_key: 0,
        }
    }

    /// Pick the product to duplicate.
    pub fn pick_product(&mut self, product_id: impl Into<String>) {
        self.source_product_id = Some(product_id.into());
    }

    #[must_use]
    pub fn source_product_id(&self) -> Option<&str> {
        self.source_product_id.as_deref()
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldSelection {
        &self.fields
    }

    pub const fn fields_mut(&mut self) -> &mut FieldSelection {
        &mut self.fields
    }

    /// Number of duplicates requested.
    #[must_use]
    pub fn quantity(&self) -> usize {
        self.rows.len()
    }

    /// Set the quantity from raw input (see [`parse_quantity`]).
    ///
    /// Existing rows are kept; new rows start blank and surplus rows are
    /// dropped from the end.
    pub fn set_quantity(&mut self, raw: &str) {
        let quantity = parse_quantity(raw);
        self.rows.resize_with(quantity, DuplicateRow::default);
    }

    #[must_use]
    pub fn rows(&self) -> &[DuplicateRow] {
        &self.rows
    }

    /// Mutable access to one row (0-based).
    pub fn row_mut(&mut self, index: usize) -> Option<&mut DuplicateRow> {
        self.rows.get_mut(index)
    }

    /// Append a local file to a row's gallery, returning its key.
    pub fn add_local_image(
        &mut self,
        row: usize,
        path: impl Into<PathBuf>,
        descriptor: FileDescriptor,
    ) -> Option<ImageKey> {
        let key = ImageKey(self.next_image_key);
        let target = self.rows.get_mut(row)?;
        target.images.push(ImageEntry::File(LocalImage {
            key,
            path: path.into(),
            descriptor,
        }));
        self.next_image_key += 1;
        Some(key)
    }

    /// Append a hosted image URL to a row's gallery.
    pub fn add_image_url(&mut self, row: usize, url: impl Into<String>) -> bool {
        self.rows.get_mut(row).is_some_and(|target| {
            target.images.push(ImageEntry::Url(url.into()));
            true
        })
    }

    /// Local files that still need uploading, row by row in gallery order.
    ///
    /// Galleries of rows whose images are not being overridden are skipped.
    #[must_use]
    pub fn pending_uploads(&self) -> Vec<&LocalImage> {
        if !self.fields.contains(OverrideField::Images) {
            return Vec::new();
        }
        self.rows.iter().flat_map(|row| row.images.files()).collect()
    }

    /// Build the orchestrator request from the form.
    ///
    /// Only selected fields are sent; everything else inherits from the
    /// source product.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] if no product is picked or a local image has no
    /// uploaded URL in `uploaded`.
    pub fn build_request(
        &self,
        uploaded: &HashMap<ImageKey, String>,
    ) -> Result<BulkDuplicateRequest, FormError> {
        let source_product_id = self
            .source_product_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(FormError::NoProductSelected)?;

        let duplicates = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| self.build_spec(index, row, uploaded))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BulkDuplicateRequest {
            source_product_id,
            duplicates,
        })
    }

    fn build_spec(
        &self,
        index: usize,
        row: &DuplicateRow,
        uploaded: &HashMap<ImageKey, String>,
    ) -> Result<DuplicateSpec, FormError> {
        let pick = |field: OverrideField, value: &str| {
            (self.fields.contains(field) && !value.trim().is_empty()).then(|| value.to_string())
        };

        let image_urls = if self.fields.contains(OverrideField::Images) {
            row.images
                .resolve(uploaded)
                .map_err(|key| FormError::MissingUpload {
                    row: index + 1,
                    key,
                })?
        } else {
            Vec::new()
        };

        Ok(DuplicateSpec {
            title: pick(OverrideField::Title, &row.title),
            image_urls,
            description_html: pick(OverrideField::Description, &row.description_html),
            vendor: pick(OverrideField::Vendor, &row.vendor),
            product_type: pick(OverrideField::ProductType, &row.product_type),
            tags: self
                .fields
                .contains(OverrideField::Tags)
                .then(|| TagsInput::Csv(row.tags.clone())),
            price: pick(OverrideField::Price, &row.price),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn jpeg(name: &str) -> FileDescriptor {
        FileDescriptor {
            filename: name.to_string(),
            mime_type: "image/jpeg".to_string(),
            file_size: 1024,
        }
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 12 "), 12);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-4"), 1);
        assert_eq!(parse_quantity("2.5"), 1);
        assert_eq!(parse_quantity("many"), 1);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("250"), MAX_QUANTITY);
        assert_eq!(parse_quantity("251"), 1);
        assert_eq!(parse_quantity("1000000000000"), 1);
    }

    #[test]
    fn test_oversized_quantity_keeps_one_row() {
        let mut form = DuplicationForm::new();
        form.set_quantity("3");
        assert_eq!(form.quantity(), 3);

        form.set_quantity("18446744073709551615");
        assert_eq!(form.quantity(), 1);
    }

    #[test]
    fn test_set_quantity_keeps_existing_rows() {
        let mut form = DuplicationForm::new();
        form.row_mut(0).unwrap().title = "First".to_string();
        form.set_quantity("3");
        assert_eq!(form.quantity(), 3);
        assert_eq!(form.rows()[0].title, "First");
        assert_eq!(form.rows()[2], DuplicateRow::default());

        form.set_quantity("nope");
        assert_eq!(form.quantity(), 1);
        assert_eq!(form.rows()[0].title, "First");
    }

    #[test]
    fn test_image_list_reorder_and_remove() {
        let mut list = ImageList::default();
        list.push(ImageEntry::Url("a".to_string()));
        list.push(ImageEntry::Url("b".to_string()));
        list.push(ImageEntry::Url("c".to_string()));

        assert!(list.move_entry(2, 0));
        assert_eq!(list.resolve(&HashMap::new()).unwrap(), vec!["c", "a", "b"]);

        assert!(!list.move_entry(0, 3));
        assert_eq!(list.remove(1), Some(ImageEntry::Url("a".to_string())));
        assert_eq!(list.remove(5), None);
        assert_eq!(list.resolve(&HashMap::new()).unwrap(), vec!["c", "b"]);
    }

    #[test]
    fn test_files_and_urls_share_one_order() {
        let mut form = DuplicationForm::new();
        form.pick_product("42");
        form.fields_mut().select(OverrideField::Images);
        form.add_image_url(0, "https://cdn.test/hosted.jpg");
        let key = form.add_local_image(0, "/tmp/local.jpg", jpeg("local.jpg")).unwrap();
        form.row_mut(0).unwrap().images.move_entry(1, 0);

        let uploaded = HashMap::from([(key, "https://storage.test/local.jpg".to_string())]);
        let request = form.build_request(&uploaded).unwrap();
        assert_eq!(
            request.duplicates[0].image_urls,
            vec!["https://storage.test/local.jpg", "https://cdn.test/hosted.jpg"]
        );
    }

    #[test]
    fn test_missing_upload_is_reported() {
        let mut form = DuplicationForm::new();
        form.pick_product("42");
        form.fields_mut().select(OverrideField::Images);
        let key = form.add_local_image(0, "/tmp/a.jpg", jpeg("a.jpg")).unwrap();

        assert_eq!(
            form.build_request(&HashMap::new()),
            Err(FormError::MissingUpload { row: 1, key })
        );
    }

    #[test]
    fn test_unselected_fields_are_not_sent() {
        let mut form = DuplicationForm::new();
        form.pick_product("42");
        form.fields_mut().select(OverrideField::Title);
        form.fields_mut().select(OverrideField::Tags);
        let row = form.row_mut(0).unwrap();
        row.title = "Copy".to_string();
        row.vendor = "Ignored".to_string();
        row.price = "1.00".to_string();

        let spec = &form.build_request(&HashMap::new()).unwrap().duplicates[0];
        assert_eq!(spec.title.as_deref(), Some("Copy"));
        assert_eq!(spec.vendor, None);
        assert_eq!(spec.price, None);
        // Tags selected but left empty still clear the source tags.
        assert_eq!(spec.tags_override(), Some(vec![]));
    }

    #[test]
    fn test_pending_uploads_skip_unselected_images() {
        let mut form = DuplicationForm::new();
        form.add_local_image(0, "/tmp/a.jpg", jpeg("a.jpg"));
        assert!(form.pending_uploads().is_empty());

        form.fields_mut().select(OverrideField::Images);
        assert_eq!(form.pending_uploads().len(), 1);
    }

    #[test]
    fn test_no_product_selected() {
        let form = DuplicationForm::new();
        assert_eq!(
            form.build_request(&HashMap::new()),
            Err(FormError::NoProductSelected)
        );
    }
}
