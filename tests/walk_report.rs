//! End-to-end traversal and reporting over the in-memory backend.

use pstwalk::mem::{MemArchive, MemFolder, MemMessage};
use pstwalk::session::with_archive;
use pstwalk::{Entry, Error, Folder, RawText, Result, WalkMode, Walker, report};

fn mailbox() -> MemFolder {
    MemFolder::unnamed()
        .with_folder(
            MemFolder::named("Inbox")
                .with_message(MemMessage::new().with_subject("Hello").with_body("World"))
                .with_message(MemMessage::new().with_body("no subject here"))
                .with_folder(MemFolder::named("2024")),
        )
        .with_folder(MemFolder::named("Sent"))
}

fn run_report(root: MemFolder, mode: WalkMode) -> Result<String> {
    with_archive(MemArchive::new(root), |root| {
        let mut out = Vec::new();
        match mode {
            WalkMode::Hierarchy => {
                report::write_folder_tree(Walker::new(root, mode), &mut out)?
            }
            WalkMode::Listing => {
                report::write_message_listing(Walker::new(root, mode), &mut out)?
            }
        }
        Ok(String::from_utf8(out).expect("report output is UTF-8"))
    })
}

#[test]
fn folder_tree_report() {
    assert_eq!(
        run_report(mailbox(), WalkMode::Hierarchy).unwrap(),
        "Inbox\n  2024\nSent\n"
    );
}

#[test]
fn message_listing_report() {
    assert_eq!(
        run_report(mailbox(), WalkMode::Listing).unwrap(),
        "Subject: Hello\n\nWorld\n\n\nno subject here\n\n"
    );
}

#[test]
fn reports_are_idempotent() {
    for mode in [WalkMode::Hierarchy, WalkMode::Listing] {
        let first = run_report(mailbox(), mode).unwrap();
        let second = run_report(mailbox(), mode).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn archive_is_released_after_success_and_failure() {
    let archive = MemArchive::new(mailbox());
    let closed = archive.close_count();
    with_archive(archive, |_| Ok(())).unwrap();
    assert_eq!(closed.get(), 1);

    let broken = MemFolder::unnamed().with_broken_folder();
    let archive = MemArchive::new(broken);
    let closed = archive.close_count();
    let err = with_archive(archive, |root| {
        let mut out = Vec::new();
        report::write_folder_tree(Walker::new(root, WalkMode::Hierarchy), &mut out)
    })
    .unwrap_err();
    assert!(matches!(err, Error::Traversal { .. }));
    assert_eq!(closed.get(), 1);
}

#[test]
fn close_failure_is_reported_alongside_a_traversal_failure() {
    let broken = MemFolder::unnamed().with_broken_folder();
    let archive = MemArchive::with_failing_close(broken, "handle leaked");
    let err = with_archive(archive, |root| {
        let mut out = Vec::new();
        report::write_folder_tree(Walker::new(root, WalkMode::Hierarchy), &mut out)
    })
    .unwrap_err();
    let text = err.to_string();
    assert!(matches!(err, Error::CloseAfter { .. }));
    assert!(text.contains("sub-folder 0"));
    assert!(text.contains("handle leaked"));
}

#[test]
fn decode_failure_names_the_field() {
    let root = MemFolder::unnamed().with_message(
        MemMessage::new()
            .with_subject("fine")
            .with_body_raw(RawText::Bytes(vec![0xC3, 0x28])),
    );
    let err = run_report(root, WalkMode::Listing).unwrap_err();
    assert!(matches!(err, Error::Decode { field: "message body", .. }));
}

#[test]
fn walker_sees_every_message_exactly_once() {
    let root = mailbox();
    let mut count = 0usize;
    for entry in Walker::new(root, WalkMode::Listing) {
        match entry.unwrap() {
            Entry::Message(_) => count += 1,
            Entry::Folder { .. } => panic!("listing mode yielded a folder"),
        }
    }
    assert_eq!(count, 2);
}

#[test]
fn deep_hierarchy_walks_without_recursion() {
    // Far deeper than a recursive walk would tolerate; the explicit
    // frame stack handles it.
    const DEPTH: usize = 2_000;
    let mut root = MemFolder::named("leaf");
    for _ in 0..DEPTH {
        root = MemFolder::unnamed().with_folder(root);
    }
    let max_depth = Walker::new(root, WalkMode::Hierarchy)
        .map(|entry| match entry.unwrap() {
            Entry::Folder { depth, .. } => depth,
            Entry::Message(_) => unreachable!(),
        })
        .max()
        .unwrap();
    assert_eq!(max_depth, DEPTH - 1);
}

#[test]
fn unnamed_folders_render_indent_only() {
    let root = MemFolder::unnamed()
        .with_folder(MemFolder::unnamed().with_folder(MemFolder::named("named")));
    assert_eq!(
        run_report(root, WalkMode::Hierarchy).unwrap(),
        "\n  named\n"
    );
}

#[test]
fn sub_folder_count_matches_walked_entries() {
    let root = mailbox();
    let direct = root.sub_folder_count();
    let walked_at_depth_zero = Walker::new(root, WalkMode::Hierarchy)
        .filter(|entry| matches!(entry, Ok(Entry::Folder { depth: 0, .. })))
        .count();
    assert_eq!(direct, walked_at_depth_zero);
}
