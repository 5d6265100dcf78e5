// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Canonical host serving wanted-person pages and photos.
pub const CANONICAL_ORIGIN: &str = "https://www.fbi.gov";

/// Rewrite an image URL onto the canonical host.
///
/// The scheme and host are replaced, duplicate slashes in the path collapse,
/// and query and fragment are dropped.
///
/// # Examples
/// ```
/// use wanted_display::utils::url::normalize_image_url;
///
/// assert_eq!(
///     normalize_image_url("http://fbi.gov//wanted/x/@@images/image/large?x=1").as_deref(),
///     Some("https://www.fbi.gov/wanted/x/@@images/image/large")
/// );
/// ```
pub fn normalize_image_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let mut path = parsed.path().to_string();
    while path.contains("//") {
        path = path.replace("//", "/");
    }
    if path.is_empty() || path == "/" {
        return None;
    }
    Some(format!("{CANONICAL_ORIGIN}{path}"))
}

/// Resolve a site-relative path against the canonical host.
pub fn canonical_page_url(path: &str) -> Option<String> {
    let base = Url::parse(CANONICAL_ORIGIN).ok()?;
    base.join(path.trim()).ok().map(|u| u.to_string())
}

/// Build a proxy passthrough URL carrying `target` as its `url` parameter.
pub fn proxy_url(proxy_host: &str, target: &str) -> Option<String> {
    let mut url = Url::parse(proxy_host).ok()?;
    url.query_pairs_mut().append_pair("url", target);
    Some(url.to_string())
}

/// Public raw-content URL for an artifact committed to a GitHub repository.
pub fn asset_url(repository: &str, branch: &str, dir: &str, file: &str) -> String {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        format!("https://raw.githubusercontent.com/{repository}/{branch}/{file}")
    } else {
        format!("https://raw.githubusercontent.com/{repository}/{branch}/{dir}/{file}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_image_url() {
        assert_eq!(
            normalize_image_url("https://api.fbi.gov/wanted/a//b/large.jpg#frag").as_deref(),
            Some("https://www.fbi.gov/wanted/a/b/large.jpg")
        );
        assert_eq!(normalize_image_url("not a url"), None);
        assert_eq!(normalize_image_url("https://www.fbi.gov/"), None);
    }

    #[test]
    fn test_canonical_page_url() {
        assert_eq!(
            canonical_page_url("/wanted/topten/john-doe").as_deref(),
            Some("https://www.fbi.gov/wanted/topten/john-doe")
        );
    }

    #[test]
    fn test_proxy_url_encodes_target() {
        assert_eq!(
            proxy_url("https://wsrv.nl/", "https://www.fbi.gov/a b.jpg?x=1&y=2").as_deref(),
            Some("https://wsrv.nl/?url=https%3A%2F%2Fwww.fbi.gov%2Fa+b.jpg%3Fx%3D1%26y%3D2")
        );
        assert_eq!(proxy_url("::nope", "x"), None);
    }

    #[test]
    fn test_asset_url() {
        assert_eq!(
            asset_url("someone/wanted", "main", "data/", "wanted_qr.png"),
            "https://raw.githubusercontent.com/someone/wanted/main/data/wanted_qr.png"
        );
        assert_eq!(
            asset_url("someone/wanted", "main", "", "qr.png"),
            "https://raw.githubusercontent.com/someone/wanted/main/qr.png"
        );
    }
}
