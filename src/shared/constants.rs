/// Quantity used when a sale line is added without a usable quantity
pub const DEFAULT_QUANTITY: u32 = 1;

/// Upper bound for a single sale line
pub const MAX_QUANTITY: u32 = 100_000;

/// Highest unit price a product may carry, in đồng
pub const MAX_PRICE: i64 = 1_000_000_000_000_000;

/// Shown where a product has no resolvable category
pub const NOT_AVAILABLE: &str = "N/A";

/// Width in characters of the plain-text receipt (80mm thermal printers)
pub const RECEIPT_WIDTH: usize = 42;

// =============================================================================
// PRODUCT IMAGES
// =============================================================================

/// Image types accepted for product uploads
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Check if an uploaded image type is allowed
pub fn is_image_type_allowed(content_type: &str) -> bool {
    ALLOWED_IMAGE_MIME_TYPES.contains(&content_type)
}
