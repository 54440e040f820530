use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub shop: ShopConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
    /// Optional directory whose `.html` files override the built-in page templates
    pub template_dir: Option<PathBuf>,
}

/// Connection settings for the external POS REST API
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL every resource path is appended to (e.g. "http://localhost:5000/api")
    pub base_url: String,
    pub timeout: Duration,
}

/// Shop-facing presentation and sales settings
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Title shown in the navigation bar and on printed invoices
    pub name: String,
    /// Image used for products saved without an uploaded image or URL
    pub placeholder_image_url: String,
    /// Largest product image accepted for upload, in bytes
    pub max_image_size: usize,
    /// Idle carts older than this are dropped
    pub cart_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            backend: BackendConfig::from_env()?,
            shop: ShopConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        let template_dir = env::var("TEMPLATE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            max_request_body_size,
            template_dir,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl BackendConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("POS_API_BASE_URL")
            .map_err(|_| "POS_API_BASE_URL environment variable is required".to_string())?;

        let timeout_secs = env::var("POS_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "POS_API_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self::new(base_url, Duration::from_secs(timeout_secs)))
    }

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

impl ShopConfig {
    const DEFAULT_NAME: &'static str = "Quản lý cửa hàng";
    const DEFAULT_PLACEHOLDER_IMAGE_URL: &'static str = "https://via.placeholder.com/150";
    const DEFAULT_MAX_IMAGE_SIZE: usize = 2 * 1024 * 1024; // 2MB
    const DEFAULT_CART_TTL_SECS: u64 = 4 * 60 * 60; // 4 hours

    pub fn from_env() -> Result<Self, String> {
        let name = env::var("SHOP_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_NAME.to_string());

        let placeholder_image_url = env::var("PLACEHOLDER_IMAGE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_PLACEHOLDER_IMAGE_URL.to_string());

        let max_image_size = env::var("MAX_IMAGE_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_IMAGE_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_IMAGE_SIZE must be a valid number".to_string())?;

        let cart_ttl_secs = env::var("CART_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CART_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CART_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            name,
            placeholder_image_url,
            max_image_size,
            cart_ttl: Duration::from_secs(cart_ttl_secs),
        })
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            placeholder_image_url: Self::DEFAULT_PLACEHOLDER_IMAGE_URL.to_string(),
            max_image_size: Self::DEFAULT_MAX_IMAGE_SIZE,
            cart_ttl: Duration::from_secs(Self::DEFAULT_CART_TTL_SECS),
        }
    }
}
