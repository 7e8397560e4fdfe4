//! File input binding
//!
//! Edits a `Files` cell through native file metadata. Only metadata
//! crosses this boundary: the accept patterns and count limit validate
//! name/MIME/count, and byte transport stays with the upload layer.

use serde::Serialize;
use tracing::debug;

use trellis_core::{AnyCell, BindError, CellValue, FileMeta, Result, SharedCellGraph, Validity};

use crate::kind::InputKind;
use crate::pipeline::{self, CellBinding};
use crate::widget::{BlurHandler, ChangeHandler, InputWidget, ValidatorFn};

/// Whether a file matches one accept pattern
///
/// Patterns follow the HTML `accept` forms: `.png` (extension),
/// `image/*` (MIME prefix), `image/png` (exact MIME).
pub fn matches_accept(meta: &FileMeta, pattern: &str) -> bool {
    if let Some(ext) = pattern.strip_prefix('.') {
        return meta
            .extension()
            .map(|e| e.eq_ignore_ascii_case(ext))
            .unwrap_or(false);
    }
    let Some(mime) = meta.mime.as_deref() else {
        return false;
    };
    if let Some(prefix) = pattern.strip_suffix("/*") {
        mime.split('/').next() == Some(prefix)
    } else {
        mime.eq_ignore_ascii_case(pattern)
    }
}

/// A bound file input
pub struct FileInput {
    widget: InputWidget<Vec<FileMeta>>,
    accept: Vec<String>,
    max_files: Option<usize>,
    binding: CellBinding,
    validator: Option<ValidatorFn<Vec<FileMeta>>>,
}

impl std::fmt::Debug for FileInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileInput")
            .field("widget", &self.widget)
            .field("accept", &self.accept)
            .field("max_files", &self.max_files)
            .finish_non_exhaustive()
    }
}

impl FileInput {
    pub fn widget(&self) -> &InputWidget<Vec<FileMeta>> {
        &self.widget
    }

    pub fn accept(&self) -> &[String] {
        &self.accept
    }

    pub fn max_files(&self) -> Option<usize> {
        self.max_files
    }

    fn kind_validity(&self, raw: Option<&Vec<FileMeta>>) -> Validity {
        let Some(files) = raw else {
            return Validity::Pass;
        };
        if let Some(max) = self.max_files {
            if files.len() > max {
                return Validity::fail(format!("more than {max} files"));
            }
        }
        if !self.accept.is_empty() {
            for file in files {
                if !self.accept.iter().any(|p| matches_accept(file, p)) {
                    return Validity::fail(format!("`{}` is not an accepted file type", file.name));
                }
            }
        }
        Validity::Pass
    }

    /// Commit a raw selection from the presentation layer
    pub fn commit(&mut self, raw: Option<Vec<FileMeta>>) {
        if self.widget.disabled {
            return;
        }
        let kind = self.kind_validity(raw.as_ref());
        let binding = &self.binding;
        let validator = self.validator.as_ref();
        self.widget = pipeline::commit(
            &self.widget,
            raw,
            |raw| pipeline::chain(kind, validator, raw),
            |raw| {
                let value = match raw {
                    Some(files) => CellValue::Files(files),
                    None if binding.nullable() => CellValue::Absent,
                    None => CellValue::Files(Vec::new()),
                };
                binding.write(value);
                match binding.read() {
                    CellValue::Files(files) => Some(files),
                    _ => None,
                }
            },
        );
    }

    pub fn blur(&self) {
        self.widget.fire_blur();
    }

    pub fn refresh(&mut self) {
        self.widget.value = match self.binding.read() {
            CellValue::Files(files) => Some(files),
            _ => None,
        };
    }

    /// Flat record for the presentation layer
    pub fn props(&self) -> FileProps {
        FileProps {
            kind: "file",
            files: self.widget.value.clone().unwrap_or_default(),
            accept: self.accept.clone(),
            max_files: self.max_files,
            nullable: self.widget.nullable,
            disabled: self.widget.disabled,
            invalid: self.widget.invalid.clone(),
            label: self.widget.label.clone(),
        }
    }
}

/// Wire shape of a file input
#[derive(Clone, Debug, Serialize)]
pub struct FileProps {
    pub kind: &'static str,
    pub files: Vec<FileMeta>,
    pub accept: Vec<String>,
    pub max_files: Option<usize>,
    pub nullable: bool,
    pub disabled: bool,
    pub invalid: Option<String>,
    pub label: Option<String>,
}

/// Builder for [`FileInput`]
pub struct FileInputBuilder {
    cell: AnyCell,
    accept: Vec<String>,
    max_files: Option<usize>,
    disabled: bool,
    label: Option<String>,
    on_change: Option<ChangeHandler<Vec<FileMeta>>>,
    on_blur: Option<BlurHandler>,
    validator: Option<ValidatorFn<Vec<FileMeta>>>,
}

/// Bind a file input to a cell
pub fn file_input(cell: &AnyCell) -> FileInputBuilder {
    FileInputBuilder {
        cell: cell.clone(),
        accept: Vec::new(),
        max_files: None,
        disabled: false,
        label: None,
        on_change: None,
        on_blur: None,
        validator: None,
    }
}

impl FileInputBuilder {
    /// Add an accept pattern (`.png`, `image/*`, `image/png`)
    pub fn accept(mut self, pattern: impl Into<String>) -> Self {
        self.accept.push(pattern.into());
        self
    }

    pub fn max_files(mut self, max: usize) -> Self {
        self.max_files = Some(max);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: Fn(&InputWidget<Vec<FileMeta>>) + Send + Sync + 'static,
    {
        self.on_change = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn on_blur<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_blur = Some(std::sync::Arc::new(handler));
        self
    }

    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(Option<&Vec<FileMeta>>) -> Validity + Send + Sync + 'static,
    {
        self.validator = Some(std::sync::Arc::new(validator));
        self
    }

    /// Construct the bound input
    pub fn build(self, graph: &SharedCellGraph) -> Result<FileInput> {
        let ty = self.cell.cell_type();
        if !InputKind::File.supports(ty) {
            return Err(BindError::UnsupportedBinding {
                kind: "file",
                ty: ty.clone(),
            });
        }
        let binding = CellBinding::new(graph.clone(), self.cell.clone());
        let seed = match binding.read() {
            CellValue::Files(files) => Some(files),
            _ => None,
        };

        let mut widget = InputWidget::new(seed, binding.nullable());
        widget.disabled = self.disabled;
        widget.label = self.label;
        widget.on_change = self.on_change;
        widget.on_blur = self.on_blur;

        debug!(cell = ?self.cell.id(), kind = "file", "input bound");
        Ok(FileInput {
            widget,
            accept: self.accept,
            max_files: self.max_files,
            binding,
            validator: self.validator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::cell::{shared, CellGraph};

    fn png(name: &str) -> FileMeta {
        FileMeta::new(name).mime("image/png")
    }

    #[test]
    fn accept_pattern_forms() {
        let f = png("photo.png");
        assert!(matches_accept(&f, ".png"));
        assert!(matches_accept(&f, ".PNG"));
        assert!(matches_accept(&f, "image/*"));
        assert!(matches_accept(&f, "image/png"));
        assert!(!matches_accept(&f, ".jpg"));
        assert!(!matches_accept(&f, "video/*"));

        let no_mime = FileMeta::new("doc.pdf");
        assert!(matches_accept(&no_mime, ".pdf"));
        assert!(!matches_accept(&no_mime, "application/pdf"));
    }

    #[test]
    fn count_and_type_constraints_flag_but_write() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(Vec::<FileMeta>::new());
        let mut input = file_input(&cell)
            .accept("image/*")
            .max_files(1)
            .build(&graph)
            .unwrap();

        input.commit(Some(vec![png("a.png"), png("b.png")]));
        assert_eq!(input.widget().invalid.as_deref(), Some("more than 1 files"));
        // validation annotates; the metadata still reached the cell
        assert_eq!(
            graph.lock().unwrap().get(&cell),
            Some(CellValue::Files(vec![png("a.png"), png("b.png")]))
        );

        input.commit(Some(vec![FileMeta::new("notes.txt").mime("text/plain")]));
        assert_eq!(
            input.widget().invalid.as_deref(),
            Some("`notes.txt` is not an accepted file type")
        );

        input.commit(Some(vec![png("a.png")]));
        assert!(input.widget().is_valid());
    }

    #[test]
    fn rejects_non_file_cells() {
        let graph = shared(CellGraph::new());
        let cell = graph.lock().unwrap().create(String::from("x"));
        assert!(matches!(
            file_input(&cell).build(&graph).unwrap_err(),
            BindError::UnsupportedBinding { kind: "file", .. }
        ));
    }
}
