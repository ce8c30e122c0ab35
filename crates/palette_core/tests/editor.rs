use palette_core::service::editor::{
    add_color, add_section, add_section_with_id, delete_section, remove_color, rename_palette,
    rename_section,
};
use palette_core::{IdAllocator, Palette, Section, DEFAULT_SECTION_TITLE};

fn sample() -> Palette {
    Palette {
        id: 100,
        title: "Sample".to_string(),
        sections: vec![
            Section::new(1, "Fondos", vec!["#111111".into(), "#222222".into()]),
            Section::new(2, "Header", vec!["#333333".into()]),
        ],
    }
}

#[test]
fn rename_palette_returns_new_value_and_keeps_input() {
    let original = sample();
    let renamed = rename_palette(&original, "Renamed");
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.sections, original.sections);
    assert_eq!(original.title, "Sample");
}

#[test]
fn add_section_appends_placeholder_with_unique_id() {
    let original = sample();
    let mut allocator = IdAllocator::with_seed(31);
    let (next, section_id) = add_section_with_id(&original, &mut allocator);

    assert_eq!(next.sections.len(), 3);
    let added = next.sections.last().unwrap();
    assert_eq!(added.id, section_id);
    assert_eq!(added.title, DEFAULT_SECTION_TITLE);
    assert!(added.colors.is_empty());
    assert!(original.section(section_id).is_none());

    let again = add_section(&next, &mut allocator);
    assert_eq!(again.section_ids().len(), 4);
}

#[test]
fn rename_section_reverts_blank_titles_to_placeholder() {
    let palette = sample();
    assert_eq!(rename_section(&palette, 1, "Fondo").sections[0].title, "Fondo");
    assert_eq!(
        rename_section(&palette, 1, "   ").sections[0].title,
        DEFAULT_SECTION_TITLE
    );
    assert_eq!(rename_section(&palette, 1, "").sections[0].title, DEFAULT_SECTION_TITLE);
    assert_eq!(rename_section(&palette, 99, "x"), palette);
}

#[test]
fn delete_section_removes_only_matching_section() {
    let palette = sample();
    let next = delete_section(&palette, 1);
    assert_eq!(next.sections.len(), 1);
    assert_eq!(next.sections[0].id, 2);
    assert_eq!(delete_section(&palette, 42), palette);
}

#[test]
fn add_color_normalizes_and_skips_empty_input() {
    let palette = sample();
    let next = add_color(&palette, 2, "abc123");
    assert_eq!(next.sections[1].colors, ["#333333", "#abc123"]);

    let kept = add_color(&palette, 2, "#ABC123");
    assert_eq!(kept.sections[1].colors.last().unwrap(), "#ABC123");

    assert_eq!(add_color(&palette, 2, ""), palette);
    assert_eq!(add_color(&palette, 77, "fff"), palette);
}

#[test]
fn remove_color_drops_index_and_ignores_out_of_range() {
    let palette = sample();
    let next = remove_color(&palette, 1, 0);
    assert_eq!(next.sections[0].colors, ["#222222"]);
    assert_eq!(remove_color(&palette, 1, 9), palette);
}
