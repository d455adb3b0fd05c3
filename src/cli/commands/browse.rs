//! browse command - Open a page in the web browser

use crate::cli::Context;
use crate::core::path;
use crate::core::types::PageId;
use crate::ui::output;
use anyhow::{Context as _, Result};
use reqwest::Url;

/// Leaf of a namespace's start page.
const START_PAGE: &str = "start";

/// Web URL for a page, derived from the XML-RPC endpoint.
///
/// `https://w.example/lib/exe/xmlrpc.php` becomes
/// `https://w.example/doku.php?id=<id>`.
pub fn page_url(endpoint: &Url, id: &PageId) -> Url {
    let path = endpoint.path();
    let base = path.strip_suffix("lib/exe/xmlrpc.php").unwrap_or_else(|| {
        path.rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    });
    let base = base.trim_end_matches('/');

    let mut url = endpoint.clone();
    url.set_path(&format!("{}/doku.php", base));
    url.set_query(None);
    url.query_pairs_mut().append_pair("id", id.as_str());
    url
}

/// Open `raw` (or the namespace's start page) in the browser.
pub fn browse(ctx: &Context, raw: Option<&str>) -> Result<()> {
    let namespace = ctx.config.namespace();
    let id = path::resolve(raw.unwrap_or(START_PAGE), &namespace)?;
    let url = page_url(&ctx.config.endpoint()?, &id);

    output::status(format!("Opening {}", url), ctx.verbosity());
    open::that(url.as_str()).with_context(|| format!("Failed to open {}", url))?;
    Ok(())
}
