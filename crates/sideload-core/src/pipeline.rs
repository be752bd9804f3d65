//! Content pipeline: markdown pass, then HTML pass, over one content string.
//!
//! Both passes always run. The markdown pass edits the text positionally; the
//! HTML pass edits attributes on a parsed tree and re-serializes only if an
//! attribute actually changed.

use serde::Serialize;

use crate::asset_store::AssetStore;
use crate::content::{ContentUnit, OwnerId};
use crate::html;
use crate::markdown;
use crate::reference::{ImageReference, Location};
use crate::sideload::{SideloadEngine, SideloadResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Markdown,
    Html,
}

/// One reference and what happened to it.
#[derive(Debug)]
pub struct ReferenceOutcome {
    pub pass: Pass,
    pub reference: ImageReference,
    pub result: SideloadResult,
}

impl ReferenceOutcome {
    pub fn is_sideloaded(&self) -> bool {
        self.result.is_ok()
    }

    /// Attempted and failed; ineligible references are not failures.
    pub fn is_failed(&self) -> bool {
        matches!(&self.result, Err(e) if !e.is_ineligible())
    }
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub content: String,
    pub changed: bool,
    pub outcomes: Vec<ReferenceOutcome>,
}

impl PipelineOutcome {
    pub fn sideloaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sideloaded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

pub struct ContentPipeline<'a, S> {
    engine: SideloadEngine<'a, S>,
}

impl<'a, S: AssetStore> ContentPipeline<'a, S> {
    pub fn new(engine: SideloadEngine<'a, S>) -> Self {
        Self { engine }
    }

    /// Rewritten content and whether it differs from `content`.
    pub fn apply(&self, content: &str, owner: OwnerId) -> (String, bool) {
        let outcome = self.run(content, owner);
        (outcome.content, outcome.changed)
    }

    /// Runs both passes over a content unit, producing a new unit.
    pub fn apply_unit(&self, unit: &ContentUnit) -> (ContentUnit, bool) {
        let (body, changed) = self.apply(&unit.body, unit.owner);
        (unit.with_body(body), changed)
    }

    /// Like [`apply`](Self::apply), keeping every per-reference outcome.
    pub fn run(&self, content: &str, owner: OwnerId) -> PipelineOutcome {
        let mut outcomes = Vec::new();

        let after_markdown = self.markdown_pass(content, owner, &mut outcomes);
        let after_html = self.html_pass(after_markdown, owner, &mut outcomes);

        let changed = after_html != content;
        PipelineOutcome {
            content: after_html,
            changed,
            outcomes,
        }
    }

    fn markdown_pass(
        &self,
        content: &str,
        owner: OwnerId,
        outcomes: &mut Vec<ReferenceOutcome>,
    ) -> String {
        let refs = markdown::scan(content);
        if refs.is_empty() {
            return content.to_string();
        }
        let results = self.engine.process(refs, owner);

        let rewritten = markdown::rewrite(
            content,
            results
                .iter()
                .filter_map(|(reference, result)| Some((reference, result.as_ref().ok()?.url.as_str()))),
        );
        outcomes.extend(results.into_iter().map(|(reference, result)| ReferenceOutcome {
            pass: Pass::Markdown,
            reference,
            result,
        }));
        rewritten
    }

    fn html_pass(
        &self,
        content: String,
        owner: OwnerId,
        outcomes: &mut Vec<ReferenceOutcome>,
    ) -> String {
        let mut doc = html::parse(&content);
        let refs = html::extract_images(&doc);
        if refs.is_empty() {
            return content;
        }
        let results = self.engine.process(refs, owner);

        for (reference, result) in &results {
            let (Location::Html { node }, Ok(image)) = (&reference.location, result) else {
                continue;
            };
            doc.set_attr(*node, "src", &image.url);
            doc.set_attr(*node, "width", &image.width.to_string());
            doc.set_attr(*node, "height", &image.height.to_string());
        }
        outcomes.extend(results.into_iter().map(|(reference, result)| ReferenceOutcome {
            pass: Pass::Html,
            reference,
            result,
        }));

        if doc.is_dirty() {
            html::serialize(&doc)
        } else {
            content
        }
    }
}
