use palette_core::{
    merge, IdAllocator, MergeError, MergeMode, Palette, PaletteDocument, Section,
};
use std::collections::HashSet;

fn palette(id: i64, title: &str, section_ids: &[i64]) -> Palette {
    Palette {
        id,
        title: title.to_string(),
        sections: section_ids
            .iter()
            .map(|section_id| Section::new(*section_id, "s", vec!["#000000".to_string()]))
            .collect(),
    }
}

fn ids(palettes: &[Palette]) -> Vec<i64> {
    palettes.iter().map(|palette| palette.id).collect()
}

#[test]
fn append_single_colliding_palette_gets_fresh_distinct_id() {
    let current = vec![palette(1, "a", &[1]), palette(2, "b", &[1])];
    let mut allocator = IdAllocator::with_seed(21);

    let outcome = merge(
        &current,
        PaletteDocument::Single(palette(2, "imported", &[1])),
        MergeMode::Append,
        &mut allocator,
    )
    .unwrap();

    assert_eq!(outcome.palettes.len(), 3);
    assert_eq!(&outcome.palettes[..2], current.as_slice());
    let new_id = outcome.palettes[2].id;
    assert!(!ids(&current).contains(&new_id));
    assert_eq!(outcome.palettes[2].title, "imported");
    assert_eq!(outcome.reassigned_palette_ids, 1);
    assert_eq!(outcome.reassigned_section_ids, 0);
}

#[test]
fn append_keeps_non_colliding_incoming_ids() {
    let current = vec![palette(1, "a", &[])];
    let mut allocator = IdAllocator::with_seed(22);

    let outcome = merge(
        &current,
        PaletteDocument::Sequence(vec![palette(7, "x", &[]), palette(8, "y", &[])]),
        MergeMode::Append,
        &mut allocator,
    )
    .unwrap();

    assert_eq!(ids(&outcome.palettes), [1, 7, 8]);
    assert_eq!(outcome.reassigned_palette_ids, 0);
    assert_eq!(outcome.imported, 2);
}

#[test]
fn append_resolves_collisions_inside_the_incoming_document() {
    let current = vec![palette(1, "a", &[])];
    let incoming = vec![
        palette(1, "dup of current", &[]),
        palette(5, "first five", &[]),
        palette(5, "second five", &[]),
    ];
    let mut allocator = IdAllocator::with_seed(23);

    let outcome = merge(
        &current,
        PaletteDocument::Sequence(incoming),
        MergeMode::Append,
        &mut allocator,
    )
    .unwrap();

    let merged = ids(&outcome.palettes);
    assert_eq!(merged.len(), 4);
    assert_eq!(merged.iter().collect::<HashSet<_>>().len(), 4);
    assert_eq!(merged[0], 1);
    assert_eq!(merged[2], 5);
    assert_eq!(outcome.reassigned_palette_ids, 2);
}

#[test]
fn fresh_ids_never_collide_with_later_incoming_ids() {
    // A fresh id must not land on an id that a later entry still carries.
    let current = vec![palette(1, "a", &[])];
    let incoming = (0..200)
        .map(|index| palette(if index == 0 { 1 } else { 1_000 + index }, "p", &[]))
        .collect::<Vec<_>>();
    let mut allocator = IdAllocator::with_seed(24);

    let outcome = merge(
        &current,
        PaletteDocument::Sequence(incoming),
        MergeMode::Append,
        &mut allocator,
    )
    .unwrap();

    let merged = ids(&outcome.palettes);
    assert_eq!(merged.iter().collect::<HashSet<_>>().len(), merged.len());
    assert_eq!(outcome.reassigned_palette_ids, 1);
}

#[test]
fn replace_with_sequence_is_identity() {
    let current = vec![palette(1, "a", &[1])];
    let incoming = vec![palette(1, "z", &[4, 4]), palette(1, "dupe kept", &[])];
    let mut allocator = IdAllocator::with_seed(25);

    let outcome = merge(
        &current,
        PaletteDocument::Sequence(incoming.clone()),
        MergeMode::Replace,
        &mut allocator,
    )
    .unwrap();

    assert_eq!(outcome.palettes, incoming);
    assert_eq!(outcome.imported, 2);
    assert_eq!(allocator.high_water_mark(), None);
}

#[test]
fn replace_with_single_object_is_an_error() {
    let mut allocator = IdAllocator::with_seed(26);
    let err = merge(
        &[],
        PaletteDocument::Single(palette(1, "a", &[])),
        MergeMode::Replace,
        &mut allocator,
    )
    .unwrap_err();
    assert_eq!(err, MergeError::ReplaceRequiresSequence);
}

#[test]
fn append_into_empty_list_takes_document() {
    let mut allocator = IdAllocator::with_seed(27);
    let outcome = merge(
        &[],
        PaletteDocument::Single(palette(4, "solo", &[1, 2])),
        MergeMode::Append,
        &mut allocator,
    )
    .unwrap();
    assert_eq!(outcome.palettes, vec![palette(4, "solo", &[1, 2])]);
}
