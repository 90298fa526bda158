//! Same-origin CORS proxy URLs.

use url::Url;

/// Query parameter that carries the wrapped origin URL.
pub const PROXY_URL_PARAM: &str = "url";

/// Wrap `origin_url` in the CORS proxy endpoint.
///
/// The result keeps the endpoint's scheme, host and path, so it is fetchable
/// wherever the endpoint is. Any existing `url` parameter on the endpoint is
/// replaced; other parameters are kept in order.
pub fn proxied_url_for(proxy_endpoint: &Url, origin_url: &str) -> Url {
    let retained: Vec<(String, String)> = proxy_endpoint
        .query_pairs()
        .filter(|(key, _)| key != PROXY_URL_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut proxied = proxy_endpoint.clone();
    proxied.set_query(None);

    {
        let mut pairs = proxied.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PROXY_URL_PARAM, origin_url);
    }

    proxied
}
