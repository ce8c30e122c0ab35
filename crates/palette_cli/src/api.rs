//! User-facing palette actions.
//!
//! # Responsibility
//! - Expose each editor action as one call over a loaded `PaletteStore`.
//! - Convert every failure into an `ActionResponse` notification.
//!
//! # Invariants
//! - Functions here never panic and never return `Err`; callers only read
//!   the envelope.
//! - Destructive actions run only when `confirmed` is true.
//! - A failed action leaves the store unchanged.
//! - Card actions update the caller's `SectionViewState` only after the store
//!   accepted the change.

use log::warn;
use palette_core::service::editor;
use palette_core::{
    export_file_name, Clipboard, Identifier, ImportError, KeyValueStore, MergeMode, Palette,
    PaletteStore, SectionViewState, EXPORT_ALL_FILE_NAME,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Result envelope for one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the action completed.
    pub ok: bool,
    /// Palette created or touched by the action.
    pub palette_id: Option<Identifier>,
    /// Section created or touched by the action.
    pub section_id: Option<Identifier>,
    /// Human-readable notification.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            palette_id: None,
            section_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            palette_id: None,
            section_id: None,
            message: message.into(),
        }
    }

    fn with_palette(mut self, palette_id: Identifier) -> Self {
        self.palette_id = Some(palette_id);
        self
    }

    fn with_section(mut self, section_id: Identifier) -> Self {
        self.section_id = Some(section_id);
        self
    }
}

/// Adds an empty palette.
pub fn add_palette<S: KeyValueStore>(store: &mut PaletteStore<S>) -> ActionResponse {
    match store.add_palette() {
        Ok(id) => ActionResponse::success("Palette added.").with_palette(id),
        Err(err) => ActionResponse::failure(format!("add_palette failed: {err}")),
    }
}

/// Renames a palette.
pub fn rename_palette<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    palette_id: Identifier,
    title: &str,
) -> ActionResponse {
    edit(store, palette_id, "rename_palette", "Palette renamed.", |palette, _| {
        editor::rename_palette(palette, title)
    })
}

/// Deletes one palette after confirmation.
pub fn delete_palette<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    palette_id: Identifier,
    confirmed: bool,
) -> ActionResponse {
    if !confirmed {
        return ActionResponse::success("Delete cancelled; confirm to remove the palette.");
    }
    match store.delete_palette(palette_id) {
        Ok(true) => ActionResponse::success("Palette deleted.").with_palette(palette_id),
        Ok(false) => not_found(palette_id),
        Err(err) => ActionResponse::failure(format!("delete_palette failed: {err}")),
    }
}

/// Deletes every palette after confirmation.
pub fn delete_all<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    confirmed: bool,
) -> ActionResponse {
    if !confirmed {
        return ActionResponse::success("Delete all cancelled; this action cannot be undone.");
    }
    let removed = store.len();
    match store.clear() {
        Ok(()) => ActionResponse::success(format!("Deleted {removed} palette(s).")),
        Err(err) => ActionResponse::failure(format!("delete_all failed: {err}")),
    }
}

/// Appends a placeholder section and opens its title for editing.
pub fn add_section<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    view: &mut SectionViewState,
    palette_id: Identifier,
) -> ActionResponse {
    let mut created = None;
    let response = edit(store, palette_id, "add_section", "Section added.", |palette, ids| {
        let (next, section_id) = editor::add_section_with_id(palette, ids);
        created = Some(section_id);
        next
    });
    let Some(section_id) = created.filter(|_| response.ok) else {
        return response;
    };
    view.start_editing(section_id);
    let mut response = response.with_section(section_id);
    if let Some(palette) = store.get(palette_id) {
        response.message = format!("{}\n{}", response.message, show_palette(palette, view));
    }
    response
}

/// Commits a section title and closes its editor; blank titles revert to
/// the placeholder.
pub fn rename_section<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    view: &mut SectionViewState,
    palette_id: Identifier,
    section_id: Identifier,
    title: &str,
) -> ActionResponse {
    if let Some(response) = require_section(store, palette_id, section_id) {
        return response;
    }
    let response = edit(store, palette_id, "rename_section", "Section renamed.", |palette, _| {
        editor::rename_section(palette, section_id, title)
    });
    if response.ok && view.is_editing(section_id) {
        view.finish_editing();
    }
    response.with_section(section_id)
}

/// Removes a section and drops its view flags.
pub fn delete_section<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    view: &mut SectionViewState,
    palette_id: Identifier,
    section_id: Identifier,
) -> ActionResponse {
    if let Some(response) = require_section(store, palette_id, section_id) {
        return response;
    }
    let response = edit(store, palette_id, "delete_section", "Section deleted.", |palette, _| {
        editor::delete_section(palette, section_id)
    });
    if response.ok {
        if let Some(palette) = store.get(palette_id) {
            view.retain_sections(&palette.section_ids());
        }
    }
    response
}

/// Adds the section's draft color. `value`, when given, replaces the draft
/// first; an empty draft adds nothing. The draft is cleared once added.
pub fn add_color<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    view: &mut SectionViewState,
    palette_id: Identifier,
    section_id: Identifier,
    value: Option<&str>,
) -> ActionResponse {
    if let Some(response) = require_section(store, palette_id, section_id) {
        return response;
    }
    if let Some(value) = value {
        view.set_draft_color(section_id, value);
    }
    let draft = view.draft_color(section_id).to_string();
    if draft.is_empty() {
        return ActionResponse::success("No color given; nothing added.")
            .with_palette(palette_id)
            .with_section(section_id);
    }
    let response = edit(store, palette_id, "add_color", "Color added.", |palette, _| {
        editor::add_color(palette, section_id, &draft)
    });
    if response.ok {
        view.clear_draft_color(section_id);
    }
    response.with_section(section_id)
}

/// Copies the color at `color_index` to the clipboard.
pub fn copy_color<S: KeyValueStore>(
    store: &PaletteStore<S>,
    clipboard: &impl Clipboard,
    palette_id: Identifier,
    section_id: Identifier,
    color_index: usize,
) -> ActionResponse {
    if let Some(response) = require_section(store, palette_id, section_id) {
        return response;
    }
    let color = store
        .get(palette_id)
        .and_then(|palette| palette.section(section_id))
        .and_then(|section| section.colors.get(color_index));
    let Some(color) = color else {
        return ActionResponse::failure(format!("color index {color_index} out of range"));
    };
    match clipboard.copy(color) {
        Ok(()) => ActionResponse::success(format!("Copied {color} to the clipboard."))
            .with_palette(palette_id)
            .with_section(section_id),
        Err(err) => {
            warn!("event=color_copy module=cli status=error error={err}");
            ActionResponse::failure(format!("copy failed: {err}"))
        }
    }
}

/// Removes the color at `color_index` from a section.
pub fn remove_color<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    palette_id: Identifier,
    section_id: Identifier,
    color_index: usize,
) -> ActionResponse {
    let color_count = store
        .get(palette_id)
        .and_then(|palette| palette.section(section_id))
        .map(|section| section.colors.len());
    match color_count {
        None => {
            if let Some(response) = require_section(store, palette_id, section_id) {
                return response;
            }
        }
        Some(count) if color_index >= count => {
            return ActionResponse::failure(format!(
                "color index {color_index} out of range; section has {count} color(s)"
            ));
        }
        Some(_) => {}
    }
    edit(store, palette_id, "remove_color", "Color removed.", |palette, _| {
        editor::remove_color(palette, section_id, color_index)
    })
    .with_section(section_id)
}

/// Writes the full list to `out`, or `palettes.json` in `default_dir`.
pub fn export_all<S: KeyValueStore>(
    store: &PaletteStore<S>,
    out: Option<&Path>,
    default_dir: &Path,
) -> ActionResponse {
    let path = out.map_or_else(|| default_dir.join(EXPORT_ALL_FILE_NAME), Path::to_path_buf);
    match store.export_all() {
        Ok(text) => write_export(&path, &text, store.len()),
        Err(err) => ActionResponse::failure(format!("export failed: {err}")),
    }
}

/// Writes one palette to `out`, or a title-derived file in `default_dir`.
pub fn export_palette<S: KeyValueStore>(
    store: &PaletteStore<S>,
    palette_id: Identifier,
    out: Option<&Path>,
    default_dir: &Path,
) -> ActionResponse {
    let Some(palette) = store.get(palette_id) else {
        return not_found(palette_id);
    };
    let path: PathBuf = out.map_or_else(
        || default_dir.join(export_file_name(&palette.title)),
        Path::to_path_buf,
    );
    match store.export_palette(palette_id) {
        Ok(Some(text)) => write_export(&path, &text, 1).with_palette(palette_id),
        Ok(None) => not_found(palette_id),
        Err(err) => ActionResponse::failure(format!("export failed: {err}")),
    }
}

/// Reads a JSON file and merges it into the store under `mode`.
pub fn import_file<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    path: &Path,
    mode: MergeMode,
) -> ActionResponse {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "event=import_read module=cli status=error mode={} error={}",
                mode.as_str(),
                err
            );
            return ActionResponse::failure(format!("Error reading the JSON file: {err}"));
        }
    };

    match store.import_text(&text, mode) {
        Ok(summary) => {
            let mut message = format!(
                "Imported {} palette(s) ({}); {} in total.",
                summary.imported,
                mode.as_str(),
                summary.total
            );
            let reassigned = summary.reassigned_palette_ids + summary.reassigned_section_ids;
            if reassigned > 0 {
                let _ = write!(message, " Reassigned {reassigned} conflicting id(s).");
            }
            ActionResponse::success(message)
        }
        Err(ImportError::Parse(err)) => {
            ActionResponse::failure(format!("Error reading the JSON file: {err}"))
        }
        Err(ImportError::Shape(message)) if mode == MergeMode::Replace => {
            ActionResponse::failure(format!(
                "Replace import needs a JSON array of palettes: {message}"
            ))
        }
        Err(err) => ActionResponse::failure(format!("import failed: {err}")),
    }
}

/// One line per palette: id, title, section and color counts.
pub fn list_palettes<S: KeyValueStore>(store: &PaletteStore<S>) -> String {
    if store.is_empty() {
        return "No palettes. Add a new one.".to_string();
    }
    store
        .palettes()
        .iter()
        .map(|palette| {
            format!(
                "{}\t{}\t{} section(s)\t{} color(s)",
                palette.id,
                palette.title,
                palette.sections.len(),
                palette.color_count()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one palette card. Expanded sections show every color; others
/// show the collapsed preview.
pub fn show_palette(palette: &Palette, view: &SectionViewState) -> String {
    let mut out = format!("{} [{}]\n", palette.title, palette.id);
    if palette.sections.is_empty() {
        out.push_str("  No sections. Add a new one.\n");
        return out;
    }
    for section in &palette.sections {
        if view.is_editing(section.id) {
            let _ = writeln!(
                out,
                "  {} [{}] (editing; commit with `section rename`)",
                section.title, section.id
            );
        } else {
            let _ = writeln!(out, "  {} [{}]", section.title, section.id);
        }
        if section.colors.is_empty() {
            out.push_str("    No colors in this section\n");
            continue;
        }
        let visible = view.visible_colors(section);
        let _ = writeln!(out, "    {}", visible.join(" "));
        if SectionViewState::has_more_colors(section) && !view.is_expanded(section.id) {
            let _ = writeln!(out, "    ... show all ({})", section.colors.len());
        }
    }
    out
}

fn edit<S: KeyValueStore>(
    store: &mut PaletteStore<S>,
    palette_id: Identifier,
    action: &str,
    success: &str,
    transform: impl FnOnce(&Palette, &mut palette_core::IdAllocator) -> Palette,
) -> ActionResponse {
    match store.edit_palette(palette_id, transform) {
        Ok(true) => ActionResponse::success(success).with_palette(palette_id),
        Ok(false) => not_found(palette_id),
        Err(err) => ActionResponse::failure(format!("{action} failed: {err}")),
    }
}

fn require_section<S: KeyValueStore>(
    store: &PaletteStore<S>,
    palette_id: Identifier,
    section_id: Identifier,
) -> Option<ActionResponse> {
    match store.get(palette_id) {
        None => Some(not_found(palette_id)),
        Some(palette) if palette.section(section_id).is_none() => Some(ActionResponse::failure(
            format!("section not found: {section_id}"),
        )),
        Some(_) => None,
    }
}

fn write_export(path: &Path, text: &str, count: usize) -> ActionResponse {
    match std::fs::write(path, text) {
        Ok(()) => ActionResponse::success(format!(
            "Exported {count} palette(s) to {}.",
            path.display()
        )),
        Err(err) => ActionResponse::failure(format!(
            "export failed writing `{}`: {err}",
            path.display()
        )),
    }
}

fn not_found(palette_id: Identifier) -> ActionResponse {
    ActionResponse::failure(format!("palette not found: {palette_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette_core::{
        ClipboardError, ClipboardResult, IdAllocator, KeyValueStore, MemoryClipboard,
        MemoryKeyValueStore, DEFAULT_STORAGE_KEY,
    };

    fn store(backend: &MemoryKeyValueStore) -> PaletteStore<&MemoryKeyValueStore> {
        PaletteStore::load(backend, DEFAULT_STORAGE_KEY, IdAllocator::with_seed(40))
            .unwrap()
            .0
    }

    #[test]
    fn unconfirmed_deletes_change_nothing() {
        let backend = MemoryKeyValueStore::new();
        let mut store = store(&backend);
        let id = store.palettes()[0].id;

        assert!(delete_palette(&mut store, id, false).message.contains("cancelled"));
        assert!(delete_all(&mut store, false).message.contains("cancelled"));
        assert_eq!(store.len(), 2);

        let deleted = delete_palette(&mut store, id, true);
        assert!(deleted.ok);
        assert_eq!(store.len(), 1);

        let cleared = delete_all(&mut store, true);
        assert!(cleared.ok, "{}", cleared.message);
        assert!(store.is_empty());
    }

    #[test]
    fn section_and_color_actions_flow_through_the_store() {
        let backend = MemoryKeyValueStore::new();
        let mut store = store(&backend);
        let mut view = SectionViewState::new();
        let palette_id = add_palette(&mut store).palette_id.unwrap();

        let added = add_section(&mut store, &mut view, palette_id);
        assert!(added.ok, "{}", added.message);
        let section_id = added.section_id.unwrap();
        assert!(view.is_editing(section_id));
        assert!(added.message.contains("(editing"));

        assert!(add_color(&mut store, &mut view, palette_id, section_id, Some("abc123")).ok);
        assert!(add_color(&mut store, &mut view, palette_id, section_id, Some("")).ok);
        assert!(rename_section(&mut store, &mut view, palette_id, section_id, "Accents").ok);
        assert!(!view.is_editing(section_id));

        let section = store.get(palette_id).unwrap().section(section_id).unwrap();
        assert_eq!(section.colors, ["#abc123"]);
        assert_eq!(section.title, "Accents");

        let out_of_range = remove_color(&mut store, palette_id, section_id, 3);
        assert!(!out_of_range.ok);
        assert!(remove_color(&mut store, palette_id, section_id, 0).ok);
        assert!(delete_section(&mut store, &mut view, palette_id, section_id).ok);
        assert!(store.get(palette_id).unwrap().sections.is_empty());
    }

    #[test]
    fn add_color_uses_the_draft_and_keeps_inner_whitespace() {
        let backend = MemoryKeyValueStore::new();
        let mut store = store(&backend);
        let mut view = SectionViewState::new();
        let palette_id = store.palettes()[1].id;
        let section_id = store.palettes()[1].sections[0].id;

        assert!(add_color(&mut store, &mut view, palette_id, section_id, None).ok);
        assert_eq!(view.draft_color(section_id), "");
        assert!(add_color(&mut store, &mut view, palette_id, section_id, None).ok);
        assert!(add_color(&mut store, &mut view, palette_id, section_id, Some(" abc")).ok);

        let colors = &store.get(palette_id).unwrap().section(section_id).unwrap().colors;
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[4], "#ffffff");
        assert_eq!(colors[5], "# abc");
    }

    #[test]
    fn copy_color_puts_the_value_on_the_clipboard() {
        let backend = MemoryKeyValueStore::new();
        let store = store(&backend);
        let clipboard = MemoryClipboard::new();
        let palette_id = store.palettes()[0].id;
        let section_id = store.palettes()[0].sections[1].id;

        let copied = copy_color(&store, &clipboard, palette_id, section_id, 1);
        assert!(copied.ok, "{}", copied.message);
        assert_eq!(clipboard.contents().as_deref(), Some("#13678A"));

        let out_of_range = copy_color(&store, &clipboard, palette_id, section_id, 2);
        assert!(!out_of_range.ok);
        assert!(out_of_range.message.contains("out of range"));
        assert!(!copy_color(&store, &clipboard, palette_id, -4, 0).ok);
        assert_eq!(clipboard.copied().len(), 1);
    }

    struct HeadlessClipboard;

    impl Clipboard for HeadlessClipboard {
        fn copy(&self, _text: &str) -> ClipboardResult<()> {
            Err(ClipboardError::Unavailable("no display".to_string()))
        }
    }

    #[test]
    fn clipboard_failure_is_a_notification() {
        let backend = MemoryKeyValueStore::new();
        let store = store(&backend);
        let palette_id = store.palettes()[0].id;
        let section_id = store.palettes()[0].sections[0].id;

        let response = copy_color(&store, &HeadlessClipboard, palette_id, section_id, 0);
        assert!(!response.ok);
        assert!(response.message.contains("no display"));
    }

    #[test]
    fn actions_on_unknown_targets_report_not_found() {
        let backend = MemoryKeyValueStore::new();
        let mut store = store(&backend);
        let palette_id = store.palettes()[0].id;

        let missing_palette = rename_palette(&mut store, -1, "x");
        assert!(!missing_palette.ok);
        assert!(missing_palette.message.contains("palette not found"));

        let mut view = SectionViewState::new();
        let missing_section = add_color(&mut store, &mut view, palette_id, -7, Some("fff"));
        assert!(!missing_section.ok);
        assert!(missing_section.message.contains("section not found"));
    }

    #[test]
    fn import_failures_are_notifications_and_keep_state() {
        let backend = MemoryKeyValueStore::new();
        let mut store = store(&backend);
        let dir = tempfile::tempdir().unwrap();
        let before = backend.get(DEFAULT_STORAGE_KEY).unwrap();

        let missing = import_file(&mut store, &dir.path().join("nope.json"), MergeMode::Append);
        assert!(!missing.ok);

        let object = dir.path().join("single.json");
        std::fs::write(&object, r#"{"id": 1, "title": "one"}"#).unwrap();
        let replace = import_file(&mut store, &object, MergeMode::Replace);
        assert!(!replace.ok);
        assert!(replace.message.contains("JSON array"));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[{").unwrap();
        assert!(!import_file(&mut store, &broken, MergeMode::Append).ok);

        assert_eq!(backend.get(DEFAULT_STORAGE_KEY).unwrap(), before);
        assert!(import_file(&mut store, &object, MergeMode::Append).ok);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn export_then_replace_import_restores_the_list() {
        let backend = MemoryKeyValueStore::new();
        let mut store = store(&backend);
        let dir = tempfile::tempdir().unwrap();
        let snapshot = store.palettes().to_vec();

        let exported = export_all(&store, None, dir.path());
        assert!(exported.ok, "{}", exported.message);
        let path = dir.path().join("palettes.json");

        add_palette(&mut store);
        let restored = import_file(&mut store, &path, MergeMode::Replace);
        assert!(restored.ok, "{}", restored.message);
        assert_eq!(store.palettes(), snapshot.as_slice());
    }

    #[test]
    fn palette_export_uses_title_for_file_name() {
        let backend = MemoryKeyValueStore::new();
        let store = store(&backend);
        let dir = tempfile::tempdir().unwrap();
        let id = store.palettes()[1].id;

        let response = export_palette(&store, id, None, dir.path());
        assert!(response.ok, "{}", response.message);
        assert!(dir.path().join("Paleta 2 - Atardecer.json").exists());
        assert!(!export_palette(&store, -3, None, dir.path()).ok);
    }

    #[test]
    fn show_palette_collapses_long_sections() {
        let backend = MemoryKeyValueStore::new();
        let mut store = store(&backend);
        let palette_id = store.palettes()[0].id;
        let section_id = store.palettes()[0].sections[0].id;
        let mut view = SectionViewState::new();
        add_color(&mut store, &mut view, palette_id, section_id, Some("#ffffff"));

        let palette = store.get(palette_id).unwrap();
        let collapsed = show_palette(palette, &view);
        assert!(collapsed.contains("show all (6)"));
        assert!(!collapsed.contains("#ffffff"));

        view.toggle_expanded(section_id);
        let expanded = show_palette(palette, &view);
        assert!(expanded.contains("#ffffff"));
        assert!(!expanded.contains("show all"));
    }

    #[test]
    fn list_reports_empty_store() {
        let backend = MemoryKeyValueStore::with_entry(DEFAULT_STORAGE_KEY, "[]");
        let store = store(&backend);
        assert_eq!(list_palettes(&store), "No palettes. Add a new one.");
    }
}
