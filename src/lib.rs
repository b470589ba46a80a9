//! # folio
//!
//! Client-side view routing, site search and highlighting for a single-page
//! static portfolio site.
//!
//! ## Features
//!
//! - Parse the page template into a mutable DOM and bind its sections,
//!   nav buttons and search widget
//! - Show exactly one section at a time, kept in step with browser history
//! - Search every section and hidden blog post, with grouped snippets
//! - Reversibly highlight search terms in the shown section
//! - Filter the wallpaper wall as the user types
//! - Open card, blog and home images in a fullscreen overlay
//!
//! ## Quick Start
//!
//! ```
//! use folio::{App, Config, Event, MemoryHost, Page, Section};
//!
//! let html = r#"<div class="gallery-page-container">
//!   <nav class="filter-nav">
//!     <button class="filter-btn" data-filter="home" data-url="/">Home</button>
//!     <button class="filter-btn" data-filter="blog" data-url="/blog">Blog</button>
//!   </nav>
//!   <div id="home-content"><h1>Hello</h1></div>
//!   <div id="blog-content"><h1>Posts</h1></div>
//! </div>"#;
//!
//! let config = Config::default();
//! let page = Page::parse(html, &config).unwrap();
//! let mut app = App::start(page, config, MemoryHost::at("/blog")).unwrap();
//! assert_eq!(app.current_section(), Some(Section::Blog));
//!
//! // Click the "Home" nav button.
//! let home = app.page().nav_buttons()[0].node;
//! app.dispatch(Event::Click(home));
//! assert_eq!(app.current_section(), Some(Section::Home));
//! assert_eq!(app.host().current().unwrap().path, "/");
//! ```
//!
//! ## Hosts
//!
//! Browser capabilities (history, storage, layout) are reached through the
//! [`Host`] trait. [`MemoryHost`] implements it in memory for tests and the
//! command line tool.

pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod filter;
pub mod goals;
pub mod highlight;
pub mod host;
pub mod overlay;
pub mod page;
pub mod pattern;
pub mod route;
pub mod router;
pub mod schedule;
pub mod search;
pub mod state;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use app::{App, Event, Key};
pub use config::{Config, SearchConfig};
pub use error::{Error, Result};
pub use filter::{CardFilter, FilterOutcome};
pub use goals::{Goal, GoalList};
pub use highlight::{HIGHLIGHT_CLASS, Highlighter};
pub use host::{Host, MemoryHost};
pub use overlay::ImageOverlay;
pub use page::{Page, Section};
pub use route::{HistoryState, PostId, Route};
pub use router::{NavOrigin, Navigation, Router};
pub use schedule::{Scheduler, Task};
pub use search::{SearchEngine, SearchOutcome, SearchResult};
pub use state::AppState;
