//! Report rendering — HTML for email, markdown for the console.

pub mod html;
pub mod markdown;

pub use html::render_html;
pub use markdown::render_markdown;
