//! Behavioural tests for tag-driven wiki request selection.

use featurephoto_core::{Tags, WikiEndpoints, WikiKind, WikiTarget, wiki_target};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug, Default)]
struct SelectionWorld {
    tags: RefCell<Tags>,
    target: RefCell<Option<WikiTarget>>,
}

#[fixture]
fn world() -> SelectionWorld {
    SelectionWorld::default()
}

fn insert(world: &SelectionWorld, key: &str, value: &str) {
    world
        .tags
        .borrow_mut()
        .insert(key.to_owned(), value.to_owned());
}

#[given("a feature tagged with wikidata {entity:word} and wikipedia {article:word}")]
fn tagged_with_wikidata_and_wikipedia(
    #[from(world)] world: &SelectionWorld,
    entity: String,
    article: String,
) {
    insert(world, "wikidata", entity.trim_matches('"'));
    insert(world, "wikipedia", article.trim_matches('"'));
}

#[given("a feature tagged only with {key:word} {value:word}")]
fn tagged_only_with(#[from(world)] world: &SelectionWorld, key: String, value: String) {
    insert(world, &key, value.trim_matches('"'));
}

#[when("I select the wiki request")]
fn select(#[from(world)] world: &SelectionWorld) {
    let tags = world.tags.borrow();
    *world.target.borrow_mut() = wiki_target(&tags, &WikiEndpoints::default());
}

#[then("the request targets the wikidata claims API")]
fn targets_wikidata(#[from(world)] world: &SelectionWorld) {
    let target = world.target.borrow();
    let target = target.as_ref().expect("expected a wiki request");
    assert_eq!(target.kind, WikiKind::Wikidata);
    assert!(target.url.contains("entity=Q243"), "url was {}", target.url);
}

#[then("the request goes to host {host:word}")]
fn targets_host(#[from(world)] world: &SelectionWorld, host: String) {
    let target = world.target.borrow();
    let target = target.as_ref().expect("expected a wiki request");
    let expected = format!("https://{}/", host.trim_matches('"'));
    assert!(target.url.starts_with(&expected), "url was {}", target.url);
}

#[then("no wiki request is produced")]
fn no_request(#[from(world)] world: &SelectionWorld) {
    assert!(world.target.borrow().is_none());
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/wiki_selection.feature", name = $title)]
        fn $fn_name(#[from(world)] world: SelectionWorld) {
            let _ = world;
        }
    };
}

register_scenario!(preferring_wikidata, "preferring the wikidata tag");
register_scenario!(defaulting_to_english, "defaulting wikipedia to English");
register_scenario!(honouring_language_prefix, "honouring the wikipedia language prefix");
register_scenario!(skipping_untagged_features, "skipping features without wiki tags");
