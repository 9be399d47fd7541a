//! Resolver-backed sorting through the editor.

mod common;

use std::future::Future;
use std::task::{Context, Waker};

use common::*;
use kurbo::Point;
use tablo_layout_core::{
    BoxFuture, Classification, Document, FixedResolver, Gender, NameResolver, OrderMatch, RemoteStrategy,
    ResolveError, ResolverResponse, SortError, SortOutcome,
};

/// A resolver whose answers never arrive.
struct Unanswered;

impl NameResolver for Unanswered {
    fn classify(&self, _names: &[String]) -> BoxFuture<'_, Result<Vec<Classification>, ResolveError>> {
        Box::pin(std::future::pending())
    }

    fn match_order(&self, _names: &[String], _target_text: &str) -> BoxFuture<'_, Result<OrderMatch, ResolveError>> {
        Box::pin(std::future::pending())
    }
}

fn x_of(editor: &tablo_layout_core::LayoutEditor, id: u64) -> f64 {
    editor.layer(id).unwrap().origin().x
}

fn resolver() -> FixedResolver {
    FixedResolver::new()
        .with_gender("Anna", Gender::Girl)
        .with_gender("Bela", Gender::Boy)
        .with_gender("Csaba", Gender::Boy)
        .with_gender("Dora", Gender::Girl)
}

#[test]
fn test_symmetric_sort_puts_smaller_group_at_edges() {
    let (layers, identities) = class_row(&["Anna", "Bela", "Csaba", "Dora"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();

    let outcome = pollster::block_on(editor.sort_with(RemoteStrategy::Symmetric, &resolver())).unwrap();
    assert_eq!(
        outcome,
        SortOutcome::Sorted {
            moved: 4,
            unmatched: Vec::new()
        }
    );
    // Boys on the edges, girls inside: Bela, Anna, Dora, Csaba.
    assert_eq!(x_of(&editor, 2), 0.0);
    assert_eq!(x_of(&editor, 1), 150.0);
    assert_eq!(x_of(&editor, 4), 300.0);
    assert_eq!(x_of(&editor, 3), 450.0);
    // Labels went along.
    assert_eq!(editor.layer(101).unwrap().origin(), Point::new(150.0, 228.0));
    assert!(!editor.is_sorting());
    assert_eq!(editor.last_sort_outcome(), Some(&outcome));
}

#[test]
fn test_group_first_drops_unclassified() {
    let (layers, identities) = class_row(&["Bela", "Cecil", "Anna"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();

    let outcome = pollster::block_on(editor.sort_with(RemoteStrategy::GroupFirst(Gender::Girl), &resolver())).unwrap();
    assert_eq!(
        outcome,
        SortOutcome::Sorted {
            moved: 2,
            unmatched: vec!["Cecil".to_string()]
        }
    );
    assert_eq!(x_of(&editor, 3), 0.0);
    assert_eq!(x_of(&editor, 1), 150.0);
    // Cecil keeps its place.
    assert_eq!(x_of(&editor, 2), 150.0);
}

#[test]
fn test_custom_order_reports_unknown_entries() {
    let (layers, identities) = class_row(&["Anna", "Bela", "Csaba", "Dora"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();

    let strategy = RemoteStrategy::Custom("dora, Csaba; Zoltan\nANNA".to_string());
    let outcome = pollster::block_on(editor.sort_with(strategy, &resolver())).unwrap();
    assert_eq!(
        outcome,
        SortOutcome::Sorted {
            moved: 3,
            unmatched: vec!["Zoltan".to_string()]
        }
    );
    assert_eq!(x_of(&editor, 4), 0.0);
    assert_eq!(x_of(&editor, 3), 150.0);
    assert_eq!(x_of(&editor, 1), 300.0);
}

#[test]
fn test_busy_until_completed() {
    let (layers, identities) = class_row(&["Anna", "Bela"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();

    let request = editor.begin_sort(RemoteStrategy::Symmetric).unwrap();
    assert!(editor.is_sorting());
    assert_eq!(
        editor.begin_sort(RemoteStrategy::Symmetric).unwrap_err(),
        SortError::Busy
    );
    assert_eq!(editor.sort_alphabetical(), Err(SortError::Busy));

    let outcome = editor.complete_sort(&request, Err(ResolveError::Network("timeout".into())));
    assert!(matches!(outcome, SortOutcome::Failed(ref msg) if msg.contains("timeout")));
    assert!(!editor.is_sorting());
    assert!(!editor.can_undo());
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn test_failing_resolver_leaves_layout() {
    let (layers, identities) = class_row(&["Bela", "Anna"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();

    let failing = FixedResolver::failing(ResolveError::Rejected("quota".into()));
    let outcome = pollster::block_on(editor.sort_with(RemoteStrategy::Symmetric, &failing)).unwrap();
    assert!(matches!(outcome, SortOutcome::Failed(_)));
    assert_eq!(x_of(&editor, 1), 0.0);
    assert_eq!(x_of(&editor, 2), 150.0);
    assert!(!editor.is_sorting());
}

#[test]
fn test_mismatched_response_fails() {
    let (layers, identities) = class_row(&["Bela", "Anna"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();

    let request = editor.begin_sort(RemoteStrategy::Symmetric).unwrap();
    let outcome = editor.complete_sort(&request, Ok(ResolverResponse::Ordered(OrderMatch::default())));
    assert!(matches!(outcome, SortOutcome::Failed(_)));
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn test_dropped_sort_is_cancelled() {
    let (layers, identities) = class_row(&["Bela", "Anna"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();

    {
        let mut sort = Box::pin(editor.sort_with(RemoteStrategy::Symmetric, &Unanswered));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(sort.as_mut().poll(&mut cx).is_pending());
    }

    assert!(!editor.is_sorting());
    assert!(editor.sort_alphabetical().is_ok());
    assert_eq!(x_of(&editor, 2), 0.0);
}

#[test]
fn test_reload_forgets_pending_sort() {
    let (layers, identities) = class_row(&["Bela", "Anna"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();
    let request = editor.begin_sort(RemoteStrategy::Symmetric).unwrap();

    editor.load_document(Document::new(1000.0, 1000.0, 300.0), &layers, &identities);
    assert!(!editor.is_sorting());
    assert_eq!(editor.last_sort_outcome(), None);

    // The answer to the old request lands on the new board and is dropped.
    let answer = vec![
        Classification {
            name: "Anna".into(),
            gender: Gender::Girl,
        },
        Classification {
            name: "Bela".into(),
            gender: Gender::Boy,
        },
    ];
    let outcome = editor.complete_sort(&request, Ok(ResolverResponse::Classified(answer)));
    assert_eq!(outcome, SortOutcome::Skipped);
    assert!(!editor.has_unsaved_changes());

    editor.select_all();
    assert!(editor.sort_alphabetical().is_ok());
}

#[test]
fn test_cancel_sort_releases_busy() {
    let (layers, identities) = class_row(&["Bela", "Anna"], 100.0);
    let mut editor = editor_with(&layers, &identities);
    editor.select_all();
    editor.begin_sort(RemoteStrategy::Custom("Anna, Bela".into())).unwrap();
    editor.cancel_sort();
    assert!(!editor.is_sorting());
    assert!(editor.begin_sort(RemoteStrategy::Symmetric).is_ok());
}
