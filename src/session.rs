// ABOUTME: Preview session for the cardpost application
// ABOUTME: Owns the open document, its preview and pagination, and reacts to edits and navigation

use crate::dom::Document;
use crate::errors::Result;
use crate::markdown::{MarkdownOptions, load_document};
use crate::pagination::{Direction, NavState, Paginator};
use crate::preview::{PageShell, Preview, guidance_element, nav_bar};
use crate::splitter::{Section, split_sections};
use crate::style::{Profile, StyleConfig};
use chrono::{DateTime, FixedOffset, Local};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Emitted when a document gains or loses its section headings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityChange {
    BecameValid,
    BecameInvalid,
}

/// What a rebuild request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// The preview is locked; the document was stored but not rendered
    Deferred,
    Rebuilt {
        sections: usize,
        validity: Option<ValidityChange>,
    },
}

/// The live view of one document
pub struct PreviewSession {
    file: Option<PathBuf>,
    document: Document,
    sections: Vec<Section>,
    preview: Preview,
    paginator: Paginator,
    config: StyleConfig,
    profile: Profile,
    posted_at: DateTime<FixedOffset>,
    pinned_time: bool,
    locked: bool,
    valid: Option<bool>,
}

impl PreviewSession {
    pub fn new(config: StyleConfig, profile: Profile) -> Self {
        Self {
            file: None,
            document: Document::default(),
            sections: Vec::new(),
            preview: Preview::empty(),
            paginator: Paginator::new(),
            config,
            profile,
            posted_at: Local::now().fixed_offset(),
            pinned_time: false,
            locked: false,
            valid: None,
        }
    }

    /// Use a fixed post time instead of stamping one on every rebuild
    pub fn with_post_time(mut self, posted_at: DateTime<FixedOffset>) -> Self {
        self.posted_at = posted_at;
        self.pinned_time = true;
        self
    }

    /// Switch to another file. Always rebuilds, even while locked.
    pub fn open(&mut self, file: &Path, document: Document) -> RebuildOutcome {
        info!("Opening {:?}", file);
        self.file = Some(file.to_path_buf());
        self.document = document;
        self.rebuild_now()
    }

    /// Render a markdown file and switch to it
    pub fn open_file(&mut self, file: &Path, options: &MarkdownOptions) -> Result<RebuildOutcome> {
        let document = load_document(file, options)?;
        Ok(self.open(file, document))
    }

    /// Replace the content of the current file
    pub fn rebuild(&mut self, document: Document) -> RebuildOutcome {
        self.document = document;
        if self.locked {
            debug!("Preview locked, deferring rebuild");
            return RebuildOutcome::Deferred;
        }
        self.rebuild_now()
    }

    fn rebuild_now(&mut self) -> RebuildOutcome {
        if !self.pinned_time {
            self.posted_at = Local::now().fixed_offset();
        }

        let outcome = split_sections(&self.document);
        let valid = outcome.is_valid();
        self.sections = outcome.into_sections();
        self.preview = Preview::build(&self.sections, &self.config, &self.profile, &self.posted_at);
        self.paginator.reset(self.sections.len());
        self.paginator.apply(self.preview.flags_mut());

        let validity = match (self.valid, valid) {
            (Some(before), now) if before == now => None,
            (_, true) => Some(ValidityChange::BecameValid),
            (_, false) => Some(ValidityChange::BecameInvalid),
        };
        self.valid = Some(valid);
        if let Some(change) = validity {
            info!("Document validity changed: {:?}", change);
        }

        RebuildOutcome::Rebuilt {
            sections: self.sections.len(),
            validity,
        }
    }

    /// Apply a new theme, template, font or profile to the unchanged document.
    /// The current card stays selected.
    pub fn restyle(&mut self, config: StyleConfig, profile: Profile) {
        self.config = config;
        self.profile = profile;
        self.preview = Preview::build(&self.sections, &self.config, &self.profile, &self.posted_at);
        self.paginator.apply(self.preview.flags_mut());
        debug!("Restyled preview, still at {:?}", self.paginator.state());
    }

    /// Lock or unlock live updates. Unlocking renders the latest document.
    pub fn set_locked(&mut self, locked: bool) -> Option<RebuildOutcome> {
        let was_locked = self.locked;
        self.locked = locked;
        if was_locked && !locked {
            info!("Preview unlocked, rebuilding");
            return Some(self.rebuild_now());
        }
        None
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn navigate(&mut self, direction: Direction) -> bool {
        let moved = self.paginator.navigate(direction);
        if moved {
            self.paginator.apply(self.preview.flags_mut());
        }
        moved
    }

    pub fn go_to(&mut self, index: usize) {
        self.paginator.go_to(index);
        self.paginator.apply(self.preview.flags_mut());
    }

    pub fn nav_state(&self) -> NavState {
        self.paginator.nav_state()
    }

    pub fn current(&self) -> Option<usize> {
        self.paginator.current()
    }

    pub fn is_valid(&self) -> bool {
        self.valid.unwrap_or(false)
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut Preview {
        &mut self.preview
    }

    /// Serialize the preview as a complete page, or the guidance page when empty
    pub fn to_html(&self, shell: &PageShell, with_nav: bool, nav_links: bool) -> String {
        match self.preview.render() {
            Some(page) => {
                let nav = with_nav.then(|| nav_bar(&self.nav_state(), nav_links));
                shell.wrap(&page, nav.as_ref())
            }
            None => shell.wrap(&guidance_element(), None),
        }
    }
}
