//! Failure extraction from Rolldown diagnostics
//!
//! A [`BuildDiagnostic`] carries everything a stats document needs: its event
//! kind, the id of the module it is about, and a human-readable rendering.
//! Anything that only exposes a `Debug` rendering goes through
//! [`ExtractedFailure::from_debug`] instead, which recovers the kind and path
//! heuristically.

use fob_tracker::{ModuleFailure, RunError};
use rolldown_error::BuildDiagnostic;

/// Kind reported when a diagnostic matches no known kind
pub const FALLBACK_KIND: &str = "BuildError";

/// Kind names recognized in debug renderings. Matched as whole identifiers.
const KNOWN_KINDS: &[&str] = &[
    "UnresolvedImport",
    "UnresolvedEntry",
    "MissingExport",
    "CircularDependency",
    "InvalidOption",
    "ParseError",
    "TransformError",
    "PluginError",
];

const MODULE_EXTENSIONS: &[&str] = &[
    ".tsx", ".ts", ".jsx", ".mjs", ".cjs", ".js", ".css", ".json", ".mdx",
];

/// Typed view of a bundler diagnostic
pub trait DiagnosticSource {
    /// Kind name, e.g. `UnresolvedImport`
    fn kind_name(&self) -> String;

    /// Id (path) of the module the diagnostic is about
    fn module_id(&self) -> Option<String>;

    /// Human-readable message, possibly colored
    fn rendered(&self) -> String;
}

impl DiagnosticSource for BuildDiagnostic {
    fn kind_name(&self) -> String {
        // Fieldless enum: Debug is the variant name
        format!("{:?}", self.kind())
    }

    fn module_id(&self) -> Option<String> {
        self.id().map(|id| id.to_string())
    }

    fn rendered(&self) -> String {
        self.to_string()
    }
}

/// A diagnostic reduced to what the stats document needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFailure {
    pub kind: String,
    pub file: Option<String>,
    pub message: String,
}

impl ExtractedFailure {
    /// Read kind, module and message from a typed diagnostic. Blank fields
    /// fall back to the heuristics used for debug renderings.
    pub fn from_diagnostic<D>(diagnostic: &D) -> Self
    where
        D: DiagnosticSource + std::fmt::Debug + ?Sized,
    {
        let message = diagnostic.rendered().trim().to_string();
        if message.is_empty() {
            return Self::from_debug(diagnostic);
        }

        let kind = Some(diagnostic.kind_name())
            .filter(|kind| !kind.trim().is_empty())
            .unwrap_or_else(|| extract_kind(&message).to_string());
        let file = diagnostic
            .module_id()
            .filter(|id| !id.is_empty())
            .or_else(|| extract_file_path(&message));

        Self {
            kind,
            file,
            message,
        }
    }

    pub fn from_debug(diagnostic: &(impl std::fmt::Debug + ?Sized)) -> Self {
        Self::from_rendered(&format!("{diagnostic:?}"))
    }

    pub fn from_rendered(rendered: &str) -> Self {
        Self {
            kind: extract_kind(rendered).to_string(),
            file: extract_file_path(rendered),
            message: rendered.trim().to_string(),
        }
    }

    pub fn to_module_failure(&self) -> ModuleFailure {
        ModuleFailure {
            kind: self.kind.clone(),
            module: self.file.clone(),
            formatted_message: Some(self.message.clone()),
        }
    }

    pub fn to_run_error(&self) -> RunError {
        RunError::new(self.kind.clone(), self.message.clone())
    }
}

// First identifier in the text that names a known kind
fn extract_kind(rendered: &str) -> &'static str {
    rendered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find_map(|token| KNOWN_KINDS.iter().copied().find(|kind| *kind == token))
        .unwrap_or(FALLBACK_KIND)
}

/// Find the first quoted or whitespace-delimited token that looks like a module path.
fn extract_file_path(rendered: &str) -> Option<String> {
    rendered
        .split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '(' | ')' | '`'))
        .map(|token| token.trim_end_matches([':', '.', ';']))
        .map(strip_location)
        .find(|token| looks_like_module(token))
        .map(str::to_string)
}

// `src/a.js:3:7` → `src/a.js`
fn strip_location(token: &str) -> &str {
    let mut rest = token;
    while let Some((head, tail)) = rest.rsplit_once(':') {
        if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            rest = head;
        } else {
            break;
        }
    }
    rest
}

fn looks_like_module(token: &str) -> bool {
    token.len() > 3
        && !token.contains("://")
        && MODULE_EXTENSIONS.iter().any(|ext| {
            token
                .strip_suffix(ext)
                .is_some_and(|stem| !stem.is_empty() && !stem.ends_with(['/', '\\']))
        })
}
