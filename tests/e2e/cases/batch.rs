//! Batched execution cases: ordered, non-atomic across accounts.

use crate::e2e::{Env, calls, fixtures::Erc20, sign_digest};
use alloy::{
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
};
use avocado::{eip712, factory::AvoFactory, types::{CastParams, ExecuteParameters}};

/// Builds a signed transfer entry for `owner`'s index-0 account.
fn entry(env: &Env, owner: &PrivateKeySigner, to: Address, amount: U256) -> ExecuteParameters {
    let avocado = AvoFactory::compute_address(owner.address(), 0);
    let params = CastParams {
        actions: vec![calls::transfer_erc20(env.erc20, to, amount)],
        ..Default::default()
    };
    let forward_params = Default::default();
    let digest = eip712::cast_digest(env.chain.chain_id(), avocado, &params, &forward_params);
    ExecuteParameters {
        owner: owner.address(),
        index: 0,
        params,
        forward_params,
        signatures: vec![sign_digest(owner, digest)],
    }
}

#[test]
fn batch_is_ordered_but_not_atomic() {
    let mut env = Env::new();
    let owner = env.owner.clone();
    let second_owner = PrivateKeySigner::random();
    let second_avocado = AvoFactory::compute_address(second_owner.address(), 0);
    Erc20::mint(&mut env.chain, env.erc20, second_avocado, U256::from(100));

    let to = Address::with_last_byte(0x77);
    let good = entry(&env, &owner, to, U256::from(10));
    // structurally broken: signed by a key that is not a signer of the account
    let bad = {
        let mut bad = entry(&env, &owner, to, U256::from(10));
        bad.signatures = vec![sign_digest(&second_owner, eip712::cast_digest(
            env.chain.chain_id(),
            env.avocado(),
            &bad.params,
            &bad.forward_params,
        ))];
        bad
    };
    let tail = entry(&env, &second_owner, to, U256::from(20));

    // abort-on-failure: the failing entry stops the batch, prior effects stay
    let results =
        env.forwarder.execute_batch(&mut env.chain, &[good, bad.clone(), tail.clone()], false);
    assert_eq!(results.len(), 2);
    assert!(results[0].result.as_ref().unwrap().success);
    assert!(results[1].error.is_some());
    assert_eq!(Erc20::balance_of(&env.chain, env.erc20, to), U256::from(10));
    // the tail entry never ran
    assert!(env.chain.account(second_avocado).is_none());

    // continue-on-revert: independent entries still execute
    let results = env.forwarder.execute_batch(&mut env.chain, &[bad, tail], true);
    assert_eq!(results.len(), 2);
    assert!(results[0].error.is_some());
    assert!(results[1].result.as_ref().unwrap().success);
    assert_eq!(Erc20::balance_of(&env.chain, env.erc20, to), U256::from(30));
}

#[test]
fn empty_batch_is_a_noop() {
    let mut env = Env::new();
    let results = env.forwarder.execute_batch(&mut env.chain, &[], false);
    assert!(results.is_empty());
    assert!(env.chain.events().is_empty());
}
