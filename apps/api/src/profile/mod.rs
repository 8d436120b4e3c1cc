// Profile input channels: manual fields, uploaded PDFs, best-effort scraping.
// Each channel produces plain profile text; none of them touch session state.

pub mod handlers;
pub mod input;
pub mod pdf;
pub mod scrape;
