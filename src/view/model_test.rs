use super::*;

fn stroke(x: f64) -> Stroke {
    Stroke { x, y: 0.0, prev_x: x - 1.0, prev_y: 0.0, color: "#000".into(), line_width: 2 }
}

fn note(id: NoteId, text: &str) -> StickyNote {
    StickyNote { id, text: text.into(), x: 10.0, y: 20.0, color: "#ffeb3b".into(), width: 200, height: 150 }
}

#[test]
fn draw_events_append_in_arrival_order() {
    let mut model = BoardModel::new();
    for i in 0..3 {
        model.apply(&Event::Draw { stroke: stroke(f64::from(i)) });
    }
    let xs: Vec<f64> = model.strokes().iter().map(|s| s.x).collect();
    assert_eq!(xs, vec![0.0, 1.0, 2.0]);
}

#[test]
fn identical_strokes_are_kept_not_deduplicated() {
    let mut model = BoardModel::new();
    model.apply(&Event::Draw { stroke: stroke(5.0) });
    model.apply(&Event::Draw { stroke: stroke(5.0) });
    assert_eq!(model.strokes().len(), 2);
}

#[test]
fn added_then_updated_upserts_by_id() {
    let mut model = BoardModel::new();
    model.apply(&Event::StickyNoteAdded { sticky_note: note(1, "old") });
    model.apply(&Event::StickyNoteUpdated { sticky_note: note(1, "new") });
    assert_eq!(model.note_count(), 1);
    assert_eq!(model.note(1).unwrap().text, "new");
}

#[test]
fn update_for_unknown_note_creates_it() {
    // Tolerant of out-of-order delivery: the update stands in for the add.
    let mut model = BoardModel::new();
    model.apply(&Event::StickyNoteUpdated { sticky_note: note(9, "late add") });
    assert_eq!(model.note(9).unwrap().text, "late add");
}

#[test]
fn remove_unknown_note_is_a_no_op() {
    let mut model = BoardModel::new();
    model.apply(&Event::StickyNoteAdded { sticky_note: note(1, "stay") });
    model.apply(&Event::StickyNoteRemoved { sticky_note_id: 42 });
    assert_eq!(model.note_count(), 1);
}

#[test]
fn clear_discards_strokes_and_notes() {
    let mut model = BoardModel::new();
    model.apply(&Event::Draw { stroke: stroke(1.0) });
    model.apply(&Event::StickyNoteAdded { sticky_note: note(1, "n") });
    model.apply(&Event::Clear);
    assert!(model.is_empty());
}

#[test]
fn error_notices_leave_the_model_untouched() {
    let mut model = BoardModel::new();
    model.apply(&Event::Draw { stroke: stroke(1.0) });
    model.apply(&Event::Error { code: "E_VALIDATION".into(), message: "bad".into(), retryable: false });
    assert_eq!(model.strokes().len(), 1);
}

#[test]
fn sorted_notes_render_in_id_order() {
    let mut model = BoardModel::new();
    for id in [3, 1, 2] {
        model.apply(&Event::StickyNoteAdded { sticky_note: note(id, "n") });
    }
    let ids: Vec<NoteId> = model.sorted_notes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn replay_then_live_builds_one_continuous_model() {
    let mut model = BoardModel::new();
    // Replay: two strokes then one note.
    model.apply(&Event::Draw { stroke: stroke(1.0) });
    model.apply(&Event::Draw { stroke: stroke(2.0) });
    model.apply(&Event::StickyNoteAdded { sticky_note: note(1, "replayed") });
    // Live traffic afterwards.
    model.apply(&Event::Draw { stroke: stroke(3.0) });
    model.apply(&Event::StickyNoteRemoved { sticky_note_id: 1 });

    assert_eq!(model.strokes().len(), 3);
    assert_eq!(model.note_count(), 0);
}
