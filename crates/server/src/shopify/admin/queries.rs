//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`
//! with hand-written `Variables` and `ResponseData` types in a module of the
//! same (snake case) name. Only the fields the duplicator reads are selected.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::Deserialize;

/// Declare an operation struct and wire it to its module's types.
macro_rules! graphql_operation {
    ($(#[$meta:meta])* $name:ident => $module:ident) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

/// `userErrors { field message }` as returned by every mutation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Product queries
// =============================================================================

graphql_operation! {
    /// Fetch everything needed to clone a product.
    GetProduct => get_product
}

pub mod get_product {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetProduct";

    pub const QUERY: &str = r"query GetProduct($id: ID!) {
  product(id: $id) {
    id
    title
    descriptionHtml
    vendor
    productType
    tags
    options {
      id
      name
      optionValues {
        id
        name
      }
    }
    variants(first: 250) {
      nodes {
        id
        price
        selectedOptions {
          name
          value
        }
      }
    }
    media(first: 50) {
      nodes {
        mediaContentType
        ... on MediaImage {
          image {
            url
          }
        }
        preview {
          image {
            url
          }
        }
      }
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<GetProductProduct>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductProduct {
        pub id: String,
        pub title: String,
        #[serde(default)]
        pub description_html: String,
        #[serde(default)]
        pub vendor: String,
        #[serde(default)]
        pub product_type: String,
        #[serde(default)]
        pub tags: Vec<String>,
        #[serde(default)]
        pub options: Vec<GetProductProductOptions>,
        pub variants: GetProductProductVariants,
        pub media: GetProductProductMedia,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductProductOptions {
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub option_values: Vec<GetProductProductOptionsOptionValues>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductProductOptionsOptionValues {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductProductVariants {
        pub nodes: Vec<GetProductProductVariantsNodes>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductProductVariantsNodes {
        pub id: String,
        pub price: String,
        #[serde(default)]
        pub selected_options: Vec<GetProductProductVariantsNodesSelectedOptions>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductProductVariantsNodesSelectedOptions {
        pub name: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductProductMedia {
        pub nodes: Vec<GetProductProductMediaNodes>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GetProductProductMediaNodes {
        pub media_content_type: String,
        #[serde(default)]
        pub image: Option<GetProductProductMediaNodesImage>,
        #[serde(default)]
        pub preview: Option<GetProductProductMediaNodesPreview>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductProductMediaNodesPreview {
        pub image: Option<GetProductProductMediaNodesImage>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct GetProductProductMediaNodesImage {
        pub url: String,
    }
}

// =============================================================================
// Product mutations
// =============================================================================

graphql_operation! {
    /// Create a product with its option schema and initial media.
    ProductCreate => product_create
}

pub mod product_create {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;

    pub const OPERATION_NAME: &str = "ProductCreate";

    pub const QUERY: &str = r"mutation ProductCreate($product: ProductCreateInput!, $media: [CreateMediaInput!]) {
  productCreate(product: $product, media: $media) {
    product {
      id
      options {
        id
        name
      }
      variants(first: 1) {
        nodes {
          id
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub product: ProductCreateInput,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub media: Vec<CreateMediaInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateInput {
        pub title: String,
        pub description_html: String,
        pub vendor: String,
        pub product_type: String,
        pub tags: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub product_options: Vec<OptionCreateInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct OptionCreateInput {
        pub name: String,
        pub values: Vec<OptionValueCreateInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct OptionValueCreateInput {
        pub name: String,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateMediaInput {
        pub original_source: String,
        pub media_content_type: MediaContentType,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum MediaContentType {
        Image,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_create: Option<ProductCreateProductCreate>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductCreateProductCreate {
        pub product: Option<ProductCreateProductCreateProduct>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductCreateProductCreateProduct {
        pub id: String,
        #[serde(default)]
        pub options: Vec<ProductCreateProductCreateProductOptions>,
        pub variants: ProductCreateProductCreateProductVariants,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductCreateProductCreateProductOptions {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductCreateProductCreateProductVariants {
        pub nodes: Vec<ProductCreateProductCreateProductVariantsNodes>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductCreateProductCreateProductVariantsNodes {
        pub id: String,
    }
}

graphql_operation! {
    /// Create variants on a product in one call.
    ProductVariantsBulkCreate => product_variants_bulk_create
}

pub mod product_variants_bulk_create {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;
    use crate::shopify::types::VariantCreateStrategy;

    pub const OPERATION_NAME: &str = "ProductVariantsBulkCreate";

    pub const QUERY: &str = r"mutation ProductVariantsBulkCreate($productId: ID!, $variants: [ProductVariantsBulkInput!]!, $strategy: ProductVariantsBulkCreateStrategy) {
  productVariantsBulkCreate(productId: $productId, variants: $variants, strategy: $strategy) {
    productVariants {
      id
      price
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
        pub strategy: Option<VariantCreateStrategy>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkInput {
        pub price: String,
        pub option_values: Vec<VariantOptionValueInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VariantOptionValueInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub option_id: Option<String>,
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_create: Option<ProductVariantsBulkCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkCreatePayload {
        pub product_variants: Option<Vec<ProductVariantsBulkCreatePayloadProductVariants>>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductVariantsBulkCreatePayloadProductVariants {
        pub id: String,
        pub price: String,
    }
}

graphql_operation! {
    /// Update existing variants in one call.
    ProductVariantsBulkUpdate => product_variants_bulk_update
}

pub mod product_variants_bulk_update {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;

    pub const OPERATION_NAME: &str = "ProductVariantsBulkUpdate";

    pub const QUERY: &str = r"mutation ProductVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {
    productVariants {
      id
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: String,
        pub variants: Vec<ProductVariantsBulkInput>,
    }

    #[derive(Debug, Serialize)]
    pub struct ProductVariantsBulkInput {
        pub id: String,
        pub price: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_variants_bulk_update: Option<ProductVariantsBulkUpdatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductVariantsBulkUpdatePayload {
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }
}

// =============================================================================
// Staged uploads
// =============================================================================

graphql_operation! {
    /// Request upload targets for files that will be posted directly to storage.
    StagedUploadsCreate => staged_uploads_create
}

pub mod staged_uploads_create {
    use serde::{Deserialize, Serialize};

    use super::UserErrorNode;

    pub const OPERATION_NAME: &str = "StagedUploadsCreate";

    pub const QUERY: &str = r"mutation StagedUploadsCreate($input: [StagedUploadInput!]!) {
  stagedUploadsCreate(input: $input) {
    stagedTargets {
      url
      resourceUrl
      parameters {
        name
        value
      }
    }
    userErrors {
      field
      message
    }
  }
}";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: Vec<StagedUploadInput>,
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadInput {
        pub filename: String,
        pub mime_type: String,
        pub http_method: StagedUploadHttpMethodType,
        pub resource: StagedUploadTargetGenerateUploadResource,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub file_size: Option<String>,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum StagedUploadHttpMethodType {
        Post,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum StagedUploadTargetGenerateUploadResource {
        Image,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub staged_uploads_create: Option<StagedUploadsCreateStagedUploadsCreate>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadsCreateStagedUploadsCreate {
        pub staged_targets: Option<Vec<StagedUploadsCreateStagedUploadsCreateStagedTargets>>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadsCreateStagedUploadsCreateStagedTargets {
        pub url: Option<String>,
        pub resource_url: Option<String>,
        #[serde(default)]
        pub parameters: Vec<StagedUploadsCreateStagedUploadsCreateStagedTargetsParameters>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct StagedUploadsCreateStagedUploadsCreateStagedTargetsParameters {
        pub name: String,
        pub value: String,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body_uses_operation_name() {
        let body = GetProduct::build_query(get_product::Variables {
            id: "gid://shopify/Product/1".to_string(),
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "GetProduct");
        assert_eq!(json["variables"]["id"], "gid://shopify/Product/1");
        assert!(json["query"].as_str().unwrap().contains("variants(first: 250)"));
    }

    #[test]
    fn test_bulk_create_variables_omit_unmatched_option_ids() {
        let body = ProductVariantsBulkCreate::build_query(product_variants_bulk_create::Variables {
            product_id: "gid://shopify/Product/2".to_string(),
            variants: vec![product_variants_bulk_create::ProductVariantsBulkInput {
                price: "10.00".to_string(),
                option_values: vec![
                    product_variants_bulk_create::VariantOptionValueInput {
                        option_id: Some("gid://shopify/ProductOption/7".to_string()),
                        name: "Large".to_string(),
                    },
                    product_variants_bulk_create::VariantOptionValueInput {
                        option_id: None,
                        name: "Red".to_string(),
                    },
                ],
            }],
            strategy: Some(crate::shopify::types::VariantCreateStrategy::RemoveStandaloneVariant),
        });
        let json = serde_json::to_value(&body).unwrap();
        let variables = &json["variables"];
        assert_eq!(variables["productId"], "gid://shopify/Product/2");
        assert_eq!(variables["strategy"], "REMOVE_STANDALONE_VARIANT");
        let values = &variables["variants"][0]["optionValues"];
        assert_eq!(values[0]["optionId"], "gid://shopify/ProductOption/7");
        assert!(values[1].get("optionId").is_none());
    }

    #[test]
    fn test_staged_upload_enums_serialize_screaming_case() {
        let input = staged_uploads_create::StagedUploadInput {
            filename: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            http_method: staged_uploads_create::StagedUploadHttpMethodType::Post,
            resource: staged_uploads_create::StagedUploadTargetGenerateUploadResource::Image,
            file_size: Some("12".to_string()),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["httpMethod"], "POST");
        assert_eq!(json["resource"], "IMAGE");
        assert_eq!(json["mimeType"], "image/png");
        assert_eq!(json["fileSize"], "12");
    }
}
