//! Type conversions from GraphQL response types to domain types.

use bulk_duplicator_core::{StagedUploadTarget, UploadParameter};

use super::queries::{UserErrorNode, get_product, product_create, staged_uploads_create};
use crate::shopify::types::{
    CreatedProduct, ProductOption, SelectedOption, SourceProduct, SourceVariant, UserError,
};

pub fn convert_user_errors(errors: Vec<UserErrorNode>) -> Vec<UserError> {
    errors
        .into_iter()
        .map(|e| UserError {
            field: e.field.unwrap_or_default(),
            message: e.message,
        })
        .collect()
}

// =============================================================================
// GetProduct conversions
// =============================================================================

pub fn convert_source_product(product: get_product::GetProductProduct) -> SourceProduct {
    SourceProduct {
        id: product.id,
        title: product.title,
        description_html: product.description_html,
        vendor: product.vendor,
        product_type: product.product_type,
        tags: product.tags,
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                id: o.id,
                name: o.name,
                values: o.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(|v| SourceVariant {
                id: v.id,
                price: v.price,
                selected_options: v
                    .selected_options
                    .into_iter()
                    .map(|o| SelectedOption {
                        name: o.name,
                        value: o.value,
                    })
                    .collect(),
            })
            .collect(),
        image_urls: extract_image_urls(product.media.nodes),
    }
}

/// Image URL of each media entry, preferring the image itself over its
/// preview. Entries with neither are skipped.
fn extract_image_urls(media: Vec<get_product::GetProductProductMediaNodes>) -> Vec<String> {
    media
        .into_iter()
        .filter_map(|m| {
            m.image
                .map(|i| i.url)
                .or_else(|| m.preview.and_then(|p| p.image).map(|i| i.url))
        })
        .collect()
}

// =============================================================================
// ProductCreate conversions
// =============================================================================

pub fn convert_created_product(
    product: product_create::ProductCreateProductCreateProduct,
) -> CreatedProduct {
    CreatedProduct {
        id: product.id,
        option_ids: product
            .options
            .into_iter()
            .map(|o| (o.name, o.id))
            .collect(),
        first_variant_id: product.variants.nodes.into_iter().next().map(|v| v.id),
    }
}

// =============================================================================
// StagedUploadsCreate conversions
// =============================================================================

pub fn convert_staged_target(
    target: staged_uploads_create::StagedUploadsCreateStagedUploadsCreateStagedTargets,
) -> StagedUploadTarget {
    StagedUploadTarget {
        url: target.url.unwrap_or_default(),
        resource_url: target.resource_url.unwrap_or_default(),
        parameters: target
            .parameters
            .into_iter()
            .map(|p| UploadParameter {
                name: p.name,
                value: p.value,
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_image_urls_prefer_image_then_preview() {
        let product: get_product::GetProductProduct = serde_json::from_value(json!({
            "id": "gid://shopify/Product/1",
            "title": "Tee",
            "descriptionHtml": "",
            "vendor": "Acme",
            "productType": "Shirt",
            "tags": ["a"],
            "options": [],
            "variants": { "nodes": [] },
            "media": { "nodes": [
                { "mediaContentType": "IMAGE", "image": { "url": "https://cdn.test/1.jpg" },
                  "preview": { "image": { "url": "https://cdn.test/1-preview.jpg" } } },
                { "mediaContentType": "VIDEO", "preview": { "image": { "url": "https://cdn.test/2-preview.jpg" } } },
                { "mediaContentType": "EXTERNAL_VIDEO", "preview": { "image": null } },
                { "mediaContentType": "IMAGE", "image": { "url": "https://cdn.test/3.jpg" } }
            ] }
        }))
        .unwrap();

        let source = convert_source_product(product);
        assert_eq!(
            source.image_urls,
            vec![
                "https://cdn.test/1.jpg",
                "https://cdn.test/2-preview.jpg",
                "https://cdn.test/3.jpg",
            ]
        );
    }

    #[test]
    fn test_created_product_maps_options_by_name() {
        let product: product_create::ProductCreateProductCreateProduct =
            serde_json::from_value(json!({
                "id": "gid://shopify/Product/9",
                "options": [
                    { "id": "gid://shopify/ProductOption/1", "name": "Size" },
                    { "id": "gid://shopify/ProductOption/2", "name": "Color" }
                ],
                "variants": { "nodes": [ { "id": "gid://shopify/ProductVariant/5" } ] }
            }))
            .unwrap();

        let created = convert_created_product(product);
        assert_eq!(created.option_id("Color"), Some("gid://shopify/ProductOption/2"));
        assert_eq!(created.option_id("color"), None);
        assert_eq!(
            created.first_variant_id.as_deref(),
            Some("gid://shopify/ProductVariant/5")
        );
    }
}
