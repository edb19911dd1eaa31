//! Design-system source readers.
//!
//! This module derives structured metadata from the raw text of a design
//! system checkout:
//!
//! - [`components`]: component listing, props, variants, dependencies
//! - [`tokens`]: CSS custom-property tokens and Tailwind theme sections
//!
//! # Expected Layout
//!
//! ```text
//! <project>/
//! ├── tailwind.config.ts
//! └── src/                  <- design-system path
//!     ├── components/<name>/<name>.tsx
//!     └── styles/globals.css
//! ```
//!
//! # Approach
//!
//! Extraction is pattern matching over text, not parsing. Passes are bounded
//! and independent; a pass that finds nothing yields an empty value rather
//! than failing the read. Only a missing component or an unreadable file is
//! reported as an error.

pub mod components;
pub mod error;
pub mod text;
pub mod tokens;

pub use components::{CodeOptions, ComponentCode, ComponentInfo, ComponentProp, ComponentReader};
pub use error::{DesignSystemError, DesignSystemResult};
pub use tokens::{
    DesignToken, Hsl, TailwindConfig, TokenCategory, TokenCollection, TokenFormat, TokenReader,
};
