use serde::Deserialize;

/// Main configuration structure for sitegauge
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum path-segment depth; pages deeper than this are fetched but
    /// their links are not followed
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// SEO problem thresholds
///
/// Every limit the per-page checks compare against. Each violation produces
/// one problem report, so these directly control how noisy a crawl is.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdConfig {
    #[serde(rename = "title-char-min", default = "default_title_char_min")]
    pub title_char_min: u32,

    #[serde(rename = "title-char-max", default = "default_title_char_max")]
    pub title_char_max: u32,

    #[serde(rename = "title-pixel-min", default = "default_title_pixel_min")]
    pub title_pixel_min: u32,

    #[serde(rename = "title-pixel-max", default = "default_title_pixel_max")]
    pub title_pixel_max: u32,

    #[serde(rename = "description-char-min", default = "default_description_char_min")]
    pub description_char_min: u32,

    #[serde(rename = "description-char-max", default = "default_description_char_max")]
    pub description_char_max: u32,

    #[serde(
        rename = "description-pixel-min",
        default = "default_description_pixel_min"
    )]
    pub description_pixel_min: u32,

    #[serde(
        rename = "description-pixel-max",
        default = "default_description_pixel_max"
    )]
    pub description_pixel_max: u32,

    #[serde(rename = "url-char-max", default = "default_url_char_max")]
    pub url_char_max: u32,

    #[serde(rename = "heading-one-char-max", default = "default_heading_char_max")]
    pub heading_one_char_max: u32,

    #[serde(rename = "heading-two-char-max", default = "default_heading_char_max")]
    pub heading_two_char_max: u32,

    /// Applies only to responses whose content type indicates an image
    #[serde(rename = "image-size-max", default = "default_image_size_max")]
    pub image_size_max: u64,
}

fn default_title_char_min() -> u32 {
    30
}

fn default_title_char_max() -> u32 {
    60
}

fn default_title_pixel_min() -> u32 {
    200
}

fn default_title_pixel_max() -> u32 {
    580
}

fn default_description_char_min() -> u32 {
    70
}

fn default_description_char_max() -> u32 {
    155
}

fn default_description_pixel_min() -> u32 {
    400
}

fn default_description_pixel_max() -> u32 {
    990
}

fn default_url_char_max() -> u32 {
    115
}

fn default_heading_char_max() -> u32 {
    70
}

fn default_image_size_max() -> u64 {
    100_000
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            title_char_min: default_title_char_min(),
            title_char_max: default_title_char_max(),
            title_pixel_min: default_title_pixel_min(),
            title_pixel_max: default_title_pixel_max(),
            description_char_min: default_description_char_min(),
            description_char_max: default_description_char_max(),
            description_pixel_min: default_description_pixel_min(),
            description_pixel_max: default_description_pixel_max(),
            url_char_max: default_url_char_max(),
            heading_one_char_max: default_heading_char_max(),
            heading_two_char_max: default_heading_char_max(),
            image_size_max: default_image_size_max(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database the result table is exported to
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
