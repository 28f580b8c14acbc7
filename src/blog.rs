use crate::config::BlogConfig;

/// Builds URLs on the blog that hosts feeds and datapoint discussions.
#[derive(Debug, Clone)]
pub struct Blog {
    host: String,
}

impl Blog {
    pub fn new(config: &BlogConfig) -> Self {
        Self {
            host: config.host.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for a path on the blog.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("http://{}{}", self.host, path)
        } else {
            format!("http://{}/{}", self.host, path)
        }
    }

    /// URL of the discussion post for the value of feature `feature_id`
    /// in language `language_id`.
    pub fn post_url(&self, feature_id: &str, language_id: &str) -> String {
        let slug = slugify(&format!("datapoint {feature_id} wals code {language_id}"));
        self.url(&format!("/{slug}/"))
    }
}

/// Lower-case, with every run of non-alphanumerics collapsed into one `-`.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
