use url::Url;

use crate::error::StoreError;

/// Just a wrapper around a URL and credentials
#[derive(Clone)]
pub struct Resource {
    url: Url,
    api_key: String,
}

impl Resource {
    pub fn new(url: Url, api_key: String) -> Self {
        Self { url, api_key }
    }

    pub fn url(&self) -> &Url { &self.url }
    pub fn api_key(&self) -> &String { &self.api_key }

    /// Build the REST endpoint of a collection, keeping the scheme and server from the base URL.
    ///
    /// A base URL that already has a path (e.g. a reverse proxy prefix) is kept as a prefix.
    pub fn collection_url(&self, collection: &str) -> Result<Url, StoreError> {
        let mut base = self.url.clone();
        if base.path().ends_with('/') == false {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(&format!("rest/v1/{}", collection))?)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the API key
        f.debug_struct("Resource").field("url", &self.url.as_str()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn collection_url_keeps_prefix() {
        let plain = Resource::new("https://db.example.com".parse().unwrap(), "key".to_string());
        assert_eq!(plain.collection_url("tasks").unwrap().as_str(), "https://db.example.com/rest/v1/tasks");

        let prefixed = Resource::new("https://example.com/store".parse().unwrap(), "key".to_string());
        assert_eq!(prefixed.collection_url("tasks").unwrap().as_str(), "https://example.com/store/rest/v1/tasks");
    }

    #[test]
    fn debug_hides_the_key() {
        let res = Resource::new("https://db.example.com".parse().unwrap(), "super-secret".to_string());
        assert!(format!("{:?}", res).contains("super-secret") == false);
    }
}
