//! # suds
//!
//! An allowlist-based HTML sanitizer for rich-text paste input.
//!
//! Given an arbitrary HTML fragment (scripts, unknown tags, unrestricted
//! attributes and inline styles included) and a [`Policy`], [`sanitize`]
//! returns a safe, formatting-preserving fragment string:
//!
//! - `script`, `style`, `meta`, `link`, `head` and `title` elements are
//!   deleted together with their content
//! - other disallowed elements are *unwrapped* - the tag goes, the visible
//!   children stay in place
//! - attributes are reduced to the allowlist, and a surviving `style`
//!   attribute is reduced to allowed CSS properties
//! - text content is never dropped or altered
//!
//! ## Quick Start
//!
//! ```
//! use suds::{Policy, sanitize};
//!
//! let pasted = r#"<section>Hello <b onclick="alert(1)">World</b></section>"#;
//! assert_eq!(sanitize(pasted, &Policy::default()), "Hello <b>World</b>");
//! ```
//!
//! The default policy matches a basic rich-text editor (paragraphs, headings,
//! lists, links, inline formatting). Custom policies are built with the
//! [`Policy`] methods:
//!
//! ```
//! use suds::{Policy, sanitize};
//!
//! let policy = Policy::new().with_tags(["p", "em"]);
//! assert_eq!(
//!     sanitize("<p><em>ok</em> <a href=\"x\">link text</a></p>", &policy),
//!     "<p><em>ok</em> link text</p>"
//! );
//! ```
//!
//! Sanitization is a pure, synchronous tree rewrite over a freshly parsed
//! fragment; there is no shared state between calls.

pub mod dom;
pub mod error;
pub mod policy;
pub mod sanitize;
pub(crate) mod style;

pub use error::{Error, Result};
pub use policy::Policy;
pub use sanitize::{sanitize, text_to_html};
