//! WASM bindings for running the router and site search in the browser.
//!
//! Both entry points take the page HTML and return JSON strings, leaving DOM
//! updates and history calls to the JavaScript side.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::page::{Page, Section};
use crate::route::Route;
use crate::router::Router;
use crate::search::SearchEngine;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedRoute {
    section: Section,
    route: Route,
    url: String,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Resolve a URL path against a page.
///
/// Returns `{ section, route: { filter, postId?, trigger? }, url }`.
#[wasm_bindgen]
pub fn resolve_route(html: &str, path: &str) -> Result<String, JsValue> {
    let config = Config::default();
    let page = Page::parse(html, &config).map_err(js_err)?;
    let router = Router::new(&page, &config, path).map_err(js_err)?;
    let resolved = router.resolve(&page, router.initial_route());
    let out = ResolvedRoute {
        url: router.paths().url_for(&resolved.route),
        section: resolved.section,
        route: resolved.route,
    };
    serde_json::to_string(&out).map_err(js_err)
}

/// Search a page.
///
/// Returns the search outcome tagged by `kind`: `too_short`, `redirect`,
/// `results` or `no_results`.
#[wasm_bindgen]
pub fn search_page(html: &str, term: &str) -> Result<String, JsValue> {
    let config = Config::default();
    let page = Page::parse(html, &config).map_err(js_err)?;
    let engine = SearchEngine::new(&config.search).map_err(js_err)?;
    serde_json::to_string(&engine.query(&page, term)).map_err(js_err)
}
