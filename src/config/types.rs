use serde::Deserialize;

/// Main configuration structure for Sumi-Glean
///
/// Every section falls back to its defaults, so an empty file (or no file at all)
/// yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds), covering the body read; unset means none
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Marker names the extractor matches against
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatcherConfig {
    /// Start tag opening an item section
    #[serde(rename = "container-tag", default = "default_container_tag")]
    pub container_tag: String,

    /// Attribute carrying the section's id on the container, and the title on the anchor
    #[serde(rename = "label-attr", default = "default_label_attr")]
    pub label_attr: String,

    /// Self-closing tag carrying the image
    #[serde(rename = "image-tag", default = "default_image_tag")]
    pub image_tag: String,

    /// Attribute carrying the image location
    #[serde(rename = "source-attr", default = "default_source_attr")]
    pub source_attr: String,

    /// Start tag carrying the destination link
    #[serde(rename = "anchor-tag", default = "default_anchor_tag")]
    pub anchor_tag: String,

    /// Attribute carrying the destination link
    #[serde(rename = "reference-attr", default = "default_reference_attr")]
    pub reference_attr: String,

    /// Prefix a link must start with to be emitted
    #[serde(rename = "absolute-prefix", default = "default_absolute_prefix")]
    pub absolute_prefix: String,
}

/// Crawl run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Capacity of the shared item channel
    #[serde(rename = "item-buffer", default = "default_item_buffer")]
    pub item_buffer: usize,

    /// Seed URLs crawled in addition to those given on the command line
    #[serde(default)]
    pub seeds: Vec<String>,
}

fn default_user_agent() -> String {
    format!("sumi-glean/{}", env!("CARGO_PKG_VERSION"))
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_container_tag() -> String {
    "span".to_string()
}

fn default_label_attr() -> String {
    "title".to_string()
}

fn default_image_tag() -> String {
    "img".to_string()
}

fn default_source_attr() -> String {
    "src".to_string()
}

fn default_anchor_tag() -> String {
    "a".to_string()
}

fn default_reference_attr() -> String {
    "href".to_string()
}

fn default_absolute_prefix() -> String {
    "http".to_string()
}

fn default_item_buffer() -> usize {
    64
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            container_tag: default_container_tag(),
            label_attr: default_label_attr(),
            image_tag: default_image_tag(),
            source_attr: default_source_attr(),
            anchor_tag: default_anchor_tag(),
            reference_attr: default_reference_attr(),
            absolute_prefix: default_absolute_prefix(),
        }
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            item_buffer: default_item_buffer(),
            seeds: Vec::new(),
        }
    }
}
