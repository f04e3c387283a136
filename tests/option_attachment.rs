use std::sync::Arc;

use callchain::chain::Deferred;
use callchain::collection::MemoryCollection;
use callchain::operation::{criteria, Operation};
use serde_json::json;

fn users() -> Arc<MemoryCollection> {
    Arc::new(MemoryCollection::new("users"))
}

#[test]
fn options_without_a_target_are_dropped() {
    let mut chain = Deferred::new(Operation::new(users(), "destroy"));
    chain
        .limit(10)
        .unwrap()
        .skip(5)
        .unwrap()
        .sort("name")
        .unwrap();
    assert!(
        chain.operations()[0].criteria().is_none(),
        "no criteria-accepting operation exists, so options must not attach anywhere"
    );
}

#[test]
fn dropped_options_do_not_reappear_on_later_finds() {
    let mut chain = Deferred::new(Operation::new(users(), "destroy"));
    chain.limit(10).unwrap();
    chain.append(Operation::new(users(), "find")).unwrap();
    assert!(
        chain.operations()[1].criteria().is_none(),
        "an option applied while no target existed is gone for good"
    );
}

#[test]
fn options_merge_into_the_single_find() {
    let mut chain = Deferred::new(
        Operation::new(users(), "find").with_criteria(criteria(json!({"name": "Mike"}))),
    );
    chain
        .sort("name")
        .unwrap()
        .limit(10)
        .unwrap()
        .skip(5)
        .unwrap();
    let merged = chain.operations()[0].criteria().expect("criteria present");
    assert_eq!(merged.get("name"), Some(&json!("Mike")), "original filter survives");
    assert_eq!(merged.get("limit"), Some(&json!(10)));
    assert_eq!(merged.get("skip"), Some(&json!(5)));
    assert_eq!(merged.get("sort"), Some(&json!("name")));
}

#[test]
fn same_named_option_overwrites() {
    let mut chain = Deferred::new(Operation::new(users(), "find"));
    chain.limit(10).unwrap().limit(3).unwrap();
    let merged = chain.operations()[0].criteria().expect("criteria present");
    assert_eq!(merged.get("limit"), Some(&json!(3)), "later limit wins");
}

#[test]
fn options_attach_to_the_most_recent_find() {
    let mut chain = Deferred::new(Operation::new(users(), "find"));
    chain.append(Operation::new(users(), "findOne")).unwrap();
    chain.limit(1).unwrap();
    assert!(
        chain.operations()[0].criteria().is_none(),
        "the earlier find must stay untouched"
    );
    assert_eq!(
        chain.operations()[1].criteria().unwrap().get("limit"),
        Some(&json!(1)),
        "the later findOne shadows the earlier find"
    );
}

#[test]
fn backward_scan_skips_effect_operations() {
    let mut chain = Deferred::new(Operation::new(users(), "find"));
    chain.append(Operation::new(users(), "destroy")).unwrap();
    chain.limit(2).unwrap();
    assert_eq!(
        chain.operations()[0].criteria().unwrap().get("limit"),
        Some(&json!(2)),
        "the option belongs to the nearest criteria-accepting operation, not the newest operation"
    );
    assert!(chain.operations()[1].criteria().is_none());
}

#[test]
fn option_creates_the_criteria_bundle_when_absent() {
    let mut chain = Deferred::new(Operation::new(users(), "find"));
    chain.sort("name desc").unwrap();
    assert_eq!(
        chain.operations()[0].criteria().unwrap().get("sort"),
        Some(&json!("name desc"))
    );
}
