//! Site-specific scrapers.
//!
//! Each scraper knows one site's HTML layout and exposes two steps:
//!
//! 1. **Listing**: turn a tag feed page into [`ArticleStub`](crate::models::ArticleStub)s
//! 2. **Article**: pull the body text out of an article page
//!
//! | Source | Module | Listing | Article body |
//! |--------|--------|---------|--------------|
//! | Izvestia | [`izvestia`] | `div.lenta_news__day` blocks | `itemprop="articleBody"`, falling back to `.text-article__inside` |

pub mod izvestia;
