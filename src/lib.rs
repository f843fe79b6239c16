// ABOUTME: Library module for the cardpost program.
// ABOUTME: Turns markdown notes into styled, paginated social-media card images.

pub mod clipboard;
pub mod config;
pub mod dom;
pub mod errors;
pub mod export;
pub mod markdown;
pub mod pagination;
pub mod preview;
pub mod render;
pub mod resources;
pub mod session;
pub mod settings;
pub mod splitter;
pub mod style;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use clipboard::{Clipboard, ClipboardCommand, CommandClipboard, copy_current};
pub use config::Config;
pub use dom::{Document, Element, Node};
pub use errors::{CardError, Result};
pub use export::{ExportArchive, ExportedImage, Exporter, ImageFormat, RasterOptions, Rasterizer};
pub use markdown::{MarkdownOptions, load_document, parse_markdown, write_html_to_file};
pub use pagination::{Direction, NavState, PaginationState, Paginator};
pub use preview::{PageShell, Preview, SectionFlags};
pub use render::ChromeRasterizer;
pub use resources::Stylesheet;
pub use session::{PreviewSession, RebuildOutcome, ValidityChange};
pub use settings::{EditField, JsonSettingsStore, MemorySettingsStore, SettingField, Settings, SettingsStore};
pub use splitter::{Section, SplitOutcome, split_sections};
pub use style::{StyleConfig, Template, Theme, style_page};
pub use watch::{WatchConfig, watch_markdown};
