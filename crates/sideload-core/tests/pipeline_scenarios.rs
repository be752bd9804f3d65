//! End-to-end pipeline behavior over a scripted asset store.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::mock_store::MockStore;
use sideload_core::asset_store::SizeSpec;
use sideload_core::pipeline::{ContentPipeline, PipelineOutcome};
use sideload_core::sideload::{IneligibleReason, SideloadEngine, SideloadError};
use sideload_core::{AllowList, AllowListPolicy, OwnerId};

fn imgur_policy() -> AllowListPolicy {
    AllowListPolicy::new(AllowList::new(["http://i.imgur.com"]))
}

fn run_with(store: &MockStore, policy: &AllowListPolicy, content: &str) -> PipelineOutcome {
    let local = vec!["http://local".to_string()];
    ContentPipeline::new(SideloadEngine::new(store, policy, &local)).run(content, OwnerId(1))
}

fn run(store: &MockStore, content: &str) -> PipelineOutcome {
    run_with(store, &imgur_policy(), content)
}

#[test]
fn markdown_image_is_sideloaded() {
    let store = MockStore::new();
    let out = run(&store, "See ![pic](http://i.imgur.com/a.png)");
    assert_eq!(out.content, "See ![pic](http://local/a.png)");
    assert!(out.changed);
    assert_eq!(out.sideloaded(), 1);
    assert_eq!(*store.fetched.borrow(), vec!["http://i.imgur.com/a.png".to_string()]);
}

#[test]
fn alt_text_is_left_untouched() {
    let store = MockStore::new();
    let out = run(&store, "![http://i.imgur.com/a.png](http://i.imgur.com/a.png)");
    assert_eq!(out.content, "![http://i.imgur.com/a.png](http://local/a.png)");
}

#[test]
fn non_allow_listed_html_is_unchanged() {
    let store = MockStore::new();
    let input = "<img src='http://evil.example.com/a.png' width='10' height='10'>";
    let out = run(&store, input);
    assert_eq!(out.content, input);
    assert!(!out.changed);
    assert_eq!(store.fetch_count(), 0);
    assert_eq!((out.sideloaded(), out.failed()), (0, 0));
}

#[test]
fn fetch_failure_leaves_reference() {
    let store = MockStore::new().failing_fetch("a.png");
    let input = "![pic](http://i.imgur.com/a.png)";
    let out = run(&store, input);
    assert_eq!(out.content, input);
    assert!(!out.changed);
    assert_eq!(out.failed(), 1);
    assert!(matches!(out.outcomes[0].result, Err(SideloadError::Fetch(_))));
}

#[test]
fn identical_references_are_fetched_independently() {
    let store = MockStore::new();
    let out = run(
        &store,
        "![a](http://i.imgur.com/a.png)\n![a](http://i.imgur.com/a.png)",
    );
    assert_eq!(store.fetch_count(), 2);
    assert_eq!(out.content, "![a](http://local/a.png)\n![a](http://local/a.png)");
}

#[test]
fn second_run_over_sideloaded_content_is_idempotent() {
    let store = MockStore::new();
    let first = run(
        &store,
        "![a](http://i.imgur.com/a.png)\n<img src=\"http://i.imgur.com/b.jpg\" width=\"5\" height=\"5\">",
    );
    assert!(first.changed);

    let again = MockStore::new();
    let second = run(&again, &first.content);
    assert!(!second.changed);
    assert_eq!(second.content, first.content);
    assert_eq!(again.fetch_count(), 0);
}

#[test]
fn html_with_size_requests_crop_when_supported() {
    let store = MockStore::new().with_crop();
    let out = run(&store, "<img src='http://i.imgur.com/a.png' width='10' height='20'>");
    assert_eq!(out.content, "<img src=\"http://local/a.png\" width=\"10\" height=\"20\">");
    assert_eq!(
        *store.resolved.borrow(),
        vec![SizeSpec::Box { width: 10, height: 20, crop: true }]
    );
}

#[test]
fn html_without_both_dimensions_requests_full_size() {
    let store = MockStore::new().with_crop();
    let out = run(&store, "<p><img src=\"http://i.imgur.com/a.png\" width=\"10\"></p>");
    assert_eq!(*store.resolved.borrow(), vec![SizeSpec::Full]);
    assert_eq!(
        out.content,
        "<p><img src=\"http://local/a.png\" width=\"800\" height=\"600\"></p>"
    );
}

#[test]
fn persist_failure_releases_temp_and_siblings_continue() {
    let store = MockStore::new().failing_persist("broken");
    let out = run(
        &store,
        "![x](http://i.imgur.com/broken.png) ![y](http://i.imgur.com/fine.png)",
    );
    assert_eq!(
        out.content,
        "![x](http://i.imgur.com/broken.png) ![y](http://local/fine.png)"
    );
    assert_eq!((out.sideloaded(), out.failed()), (1, 1));
    assert_eq!(store.released(), 1);
}

#[test]
fn unresolvable_asset_leaves_reference() {
    let store = MockStore::new().failing_resolve("gone");
    let input = "<img src=\"http://i.imgur.com/gone.png\">";
    let out = run(&store, input);
    assert_eq!(out.content, input);
    assert!(matches!(out.outcomes[0].result, Err(SideloadError::Resolution)));
}

#[test]
fn unsupported_extension_is_not_fetched() {
    let store = MockStore::new();
    let out = run(&store, "![a](http://i.imgur.com/a.webp) ![b](http://i.imgur.com/b.PNG?w=2)");
    assert_eq!(store.fetch_count(), 1);
    assert!(matches!(
        out.outcomes[0].result,
        Err(SideloadError::Ineligible(IneligibleReason::UnsupportedExtension))
    ));
    assert_eq!(out.content, "![a](http://i.imgur.com/a.webp) ![b](http://local/b.PNG)");
}

#[test]
fn encoded_url_is_decoded_once_before_fetch() {
    let store = MockStore::new();
    let out = run(&store, "![a](http://i.imgur.com/my%20pic.png)");
    assert_eq!(*store.fetched.borrow(), vec!["http://i.imgur.com/my pic.png".to_string()]);
    assert_eq!(out.content, "![a](http://local/my-pic.png)");
}

#[test]
fn prefix_match_is_exact_and_case_sensitive() {
    let store = MockStore::new();
    let out = run(
        &store,
        "![a](http://i.imgur.co/a.png) ![b](HTTP://i.imgur.com/b.png)",
    );
    assert!(!out.changed);
    assert_eq!(store.fetch_count(), 0);
}

#[test]
fn both_passes_run_over_mixed_content() {
    let store = MockStore::new();
    let out = run(
        &store,
        "<p>![a](http://i.imgur.com/a.png)</p>\n<img src=\"http://i.imgur.com/b.png\">",
    );
    assert_eq!(
        out.content,
        "<p>![a](http://local/a.png)</p>\n\n\n<img src=\"http://local/b.png\" width=\"800\" height=\"600\">",
        "a whitespace-only top-level text node also gets its own trailing newline"
    );
    assert_eq!(out.sideloaded(), 2);
}

#[test]
fn allow_list_filters_are_evaluated_on_every_run() {
    let blocked = Arc::new(AtomicBool::new(true));
    let mut policy = imgur_policy();
    let flag = Arc::clone(&blocked);
    policy.register(move |mut list: AllowList| {
        if flag.load(Ordering::SeqCst) {
            list.retain(|p| p != "http://i.imgur.com");
        }
        list
    });

    let input = "![a](http://i.imgur.com/a.png)";
    let store = MockStore::new();
    assert!(!run_with(&store, &policy, input).changed);
    assert_eq!(store.fetch_count(), 0);

    blocked.store(false, Ordering::SeqCst);
    assert!(run_with(&store, &policy, input).changed);
    assert_eq!(store.fetch_count(), 1);
}

#[test]
fn rewriting_an_image_preserves_sibling_attributes() {
    let store = MockStore::new();
    let out = run(
        &store,
        r#"<a href="http://example.com/?a=1&amp;b=2" title="&hellip;">more</a><img alt="Caf&eacute; &copy;" src="http://i.imgur.com/a.png">"#,
    );
    assert!(out.changed);
    assert_eq!(
        out.content,
        "<a href=\"http://example.com/?a=1&amp;b=2\" title=\"…\">more</a>\n\
         <img alt=\"Café ©\" src=\"http://local/a.png\" width=\"800\" height=\"600\">"
    );

    let doc = sideload_core::html::parse(&out.content);
    let a = doc.find_all("a")[0];
    assert_eq!(doc.attr(a, "href"), Some("http://example.com/?a=1&b=2"));
    assert_eq!(doc.attr(a, "title"), Some("…"));
}

#[test]
fn escaped_text_survives_a_rewrite() {
    let store = MockStore::new();
    let out = run(
        &store,
        "<p>5 &lt; 6 &amp;&nbsp;&copy; 2024</p><img src=\"http://i.imgur.com/a.png\">",
    );
    assert_eq!(
        out.content,
        "<p>5 &lt; 6 &amp;&nbsp;© 2024</p>\n<img src=\"http://local/a.png\" width=\"800\" height=\"600\">"
    );
}

#[test]
fn html_src_is_fetched_decoded() {
    let store = MockStore::new();
    run(&store, r#"<img src="http://i.imgur.com/a.png?x=1&amp;y=2">"#);
    assert_eq!(
        *store.fetched.borrow(),
        vec!["http://i.imgur.com/a.png?x=1&y=2".to_string()]
    );
}
