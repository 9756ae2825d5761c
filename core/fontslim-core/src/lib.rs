//! fontslim-core: the tailor that takes a web font in to fit the site
//!
//! A blog rarely uses more than a few thousand distinct characters, yet it
//! ships a font that knows tens of thousands. This library reads the pages a
//! site actually serves, works out which characters they use, and asks a
//! font subsetter to cut everything else away.
//!
//! ## Five Steps, In Order
//!
//! **Discovery**: walk the site tree and collect every `index.html`
//! (case-insensitive), skipping directories we cannot read.
//!
//! **Merge**: read each page as UTF-8, drop blank and unreadable pages,
//! keep one copy of every distinct page and write them to one file.
//!
//! **Keep-set**: every distinct character of the merged text, in
//! first-occurrence order (or the legacy last-line order, if you need
//! byte-for-byte parity with older output).
//!
//! **Subset**: hand the font and the keep-set to `pyftsubset` (or any
//! [`subset::Subsetter`]) with hinting dropped.
//!
//! **Cleanup**: remove both intermediate files, whatever happened above.
//!
//! ## A Sample Run
//!
//! ```rust,no_run
//! use fontslim_core::pipeline::{run, PipelineConfig};
//! use fontslim_core::subset::PyftSubset;
//!
//! let config = PipelineConfig::new("public", "fonts/NotoSansSC-Regular.ttf")
//!     .with_output_font("public/fonts/site.ttf");
//!
//! let report = run(&config, &PyftSubset::default())?;
//! println!(
//!     "{} pages, {} characters kept",
//!     report.scan.discovered.len(),
//!     report.scan.keep_char_count
//! );
//! #
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Ground Rules
//!
//! - Everything runs on one thread, one stage after another.
//! - Fonts are never opened here; the subsetter owns that job.
//! - Only a missing input or a site without index files stops a run.
//!   Everything else is logged through the `log` facade and recorded in the
//!   report.
//!
//! ---
//!
//! Crafted with care at FontLab https://www.fontlab.com/

pub mod charset;
pub mod cleanup;
pub mod codepoints;
pub mod discovery;
pub mod error;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod subset;
