use std::sync::Arc;

use callchain::chain::Deferred;
use callchain::collection::MemoryCollection;
use callchain::operation::Operation;

fn find_chain() -> Deferred {
    let users = Arc::new(MemoryCollection::new("users"));
    Deferred::new(Operation::new(users, "find"))
}

#[tokio::test]
async fn done_terminates_the_chain_exactly_once() {
    let mut chain = find_chain();
    assert!(!chain.terminated(), "chains start in the building state");
    chain.done().await.expect("first resolution succeeds");
    assert!(chain.terminated());
    let err = chain.done().await.expect_err("second resolution must fail");
    assert!(err.is_usage(), "expected a usage error, got: {err}");
}

#[tokio::test]
async fn options_after_termination_fail() {
    let mut chain = find_chain();
    chain.done().await.expect("resolution succeeds");
    assert!(chain.limit(10).unwrap_err().is_usage());
    assert!(chain.skip(5).unwrap_err().is_usage());
    assert!(chain.sort("name").unwrap_err().is_usage());
}

#[tokio::test]
async fn append_after_termination_fails() {
    let users = Arc::new(MemoryCollection::new("users"));
    let mut chain = Deferred::new(Operation::new(users.clone(), "find"));
    chain.done().await.expect("resolution succeeds");
    let err = chain
        .append(Operation::new(users, "destroy"))
        .expect_err("the chain is frozen");
    assert!(err.is_usage());
}

#[tokio::test]
async fn termination_sticks_even_when_resolution_fails() {
    let users = Arc::new(MemoryCollection::new("users"));
    // findBySurname is find-style but not provided by the collection.
    let mut chain = Deferred::new(Operation::new(users, "findBySurname"));
    chain
        .done()
        .await
        .expect_err("resolution fails on the missing method");
    let err = chain.done().await.expect_err("still terminated");
    assert!(err.is_usage(), "a failed resolution terminates the chain too");
}
