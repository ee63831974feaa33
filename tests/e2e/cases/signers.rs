//! Signer-set mutation cases: self-calls, the side index and upgrades.

use crate::e2e::{Env, IMPL_V1, calls, fixtures};
use alloy::primitives::{Address, B256, U256};
use avocado::{
    eip712,
    error::{AvocadoError, CastError},
    types::{Event, NON_SEQUENTIAL_NONCE},
};

#[test]
fn add_and_remove_signers() {
    let mut env = Env::new();
    let avocado = env.avocado();
    let owner = env.owner.clone();

    let mut added: Vec<_> = env.cosigners.iter().take(2).map(|s| s.address()).collect();
    added.sort();

    let params = env.next_params(vec![calls::add_signers(avocado, added.clone(), 2)]);
    assert!(env.cast(params, &[&owner]).unwrap().success);

    let account = env.chain.account(avocado).unwrap();
    assert_eq!(account.signers.len(), 3);
    assert_eq!(account.signers.required_signers(), 2);
    assert!(account.signers.contains(owner.address()));

    // the side index learned about both signers
    for signer in &added {
        assert_eq!(env.chain.signers_list().accounts_of(*signer), vec![avocado]);
    }

    // removing them again needs the 2-of-3 threshold
    let mut two: Vec<_> = env.all_signers().into_iter().cloned().collect();
    two.retain(|signer| {
        signer.address() == owner.address() || signer.address() == added[0]
    });
    let signer_refs: Vec<_> = two.iter().collect();
    let params = env.next_params(vec![calls::remove_signers(avocado, added.clone(), 1)]);
    assert!(env.cast(params, &signer_refs).unwrap().success);

    let account = env.chain.account(avocado).unwrap();
    assert_eq!(account.signers.signers(), &[owner.address()]);
    assert_eq!(account.signers.required_signers(), 1);
    for signer in &added {
        assert!(env.chain.signers_list().accounts_of(*signer).is_empty());
    }
}

#[test]
fn invalid_signer_mutation_fails_the_cast() {
    let mut env = Env::new();
    let avocado = env.avocado();
    let owner = env.owner.clone();

    // removing the owner is refused; the failure is an action failure, so
    // the nonce burns but the set is untouched
    let params = env.next_params(vec![calls::remove_signers(avocado, vec![owner.address()], 1)]);
    let result = env.cast(params, &[&owner]).unwrap();
    assert!(!result.success);

    let account = env.chain.account(avocado).unwrap();
    assert_eq!(account.signers.signers(), &[owner.address()]);
    assert_eq!(account.nonce.sequential(), U256::from(1));
}

#[test]
fn signer_mutations_roll_back_with_the_cast() {
    let mut env = Env::new();
    let avocado = env.avocado();
    let owner = env.owner.clone();
    let rejecting = Address::with_last_byte(0xde);
    fixtures::register_rejecting(&mut env.chain, rejecting);

    let mut added: Vec<_> = env.cosigners.iter().take(2).map(|s| s.address()).collect();
    added.sort();

    // the signer mutation succeeds as action 0, then action 1 reverts
    let params = env.next_params(vec![
        calls::add_signers(avocado, added.clone(), 2),
        calls::call(rejecting, Default::default()),
    ]);
    let result = env.cast(params, &[&owner]).unwrap();
    assert!(!result.success);

    let account = env.chain.account(avocado).unwrap();
    assert_eq!(account.signers.signers(), &[owner.address()]);
    // rolled-back mutations never reach the side index
    for signer in &added {
        assert!(env.chain.signers_list().accounts_of(*signer).is_empty());
    }
}

#[test]
fn opted_out_accounts_skip_the_side_index() {
    let mut env = Env::new();
    let avocado = env.avocado();
    let owner = env.owner.clone();

    env.forwarder.deploy(&mut env.chain, owner.address(), 0).unwrap();
    env.chain.account_mut(avocado).unwrap().track_in_storage = false;

    let added = vec![env.cosigners[0].address()];
    let params = env.next_params(vec![calls::add_signers(avocado, added.clone(), 1)]);
    assert!(env.cast(params, &[&owner]).unwrap().success);

    assert!(env.chain.account(avocado).unwrap().signers.contains(added[0]));
    assert!(env.chain.signers_list().accounts_of(added[0]).is_empty());
}

#[test]
fn set_required_signers() {
    let mut env = Env::new();
    let avocado = env.avocado();
    let owner = env.owner.clone();

    let mut added: Vec<_> = env.cosigners.iter().take(2).map(|s| s.address()).collect();
    added.sort();
    let params = env.next_params(vec![
        calls::add_signers(avocado, added, 1),
        calls::set_required_signers(avocado, 3),
    ]);
    assert!(env.cast(params, &[&owner]).unwrap().success);
    assert_eq!(env.chain.account(avocado).unwrap().signers.required_signers(), 3);
    assert!(env
        .chain
        .events()
        .iter()
        .any(|event| matches!(event, Event::RequiredSignersSet { required_signers: 3, .. })));

    // out-of-bounds thresholds fail the action
    let members = env.chain.account(avocado).unwrap().signers.signers().to_vec();
    let owned: Vec<_> = env.all_signers().into_iter().cloned().collect();
    let refs: Vec<_> = owned.iter().filter(|s| members.contains(&s.address())).collect();
    let params = env.next_params(vec![calls::set_required_signers(avocado, 9)]);
    let result = env.cast(params, &refs).unwrap();
    assert!(!result.success);
    assert_eq!(env.chain.account(avocado).unwrap().signers.required_signers(), 3);
}

#[test]
fn occupy_non_sequential_nonces() {
    let mut env = Env::new();
    let avocado = env.avocado();
    let owner = env.owner.clone();

    let burned = B256::repeat_byte(0x44);
    let params = env.next_params(vec![calls::occupy_nonces(avocado, vec![burned])]);
    assert!(env.cast(params, &[&owner]).unwrap().success);
    assert!(env.chain.account(avocado).unwrap().nonce.is_digest_consumed(burned));

    // a cast whose digest was pre-burned can never execute: burn the digest
    // of a known payload, then try to cast it
    let mut victim = env.next_params(vec![]);
    victim.avoNonce = NON_SEQUENTIAL_NONCE;
    victim.salt = B256::repeat_byte(0x55);
    let forward_params = env.forward_params();
    let digest =
        eip712::cast_digest(env.chain.chain_id(), avocado, &victim, &forward_params);

    let params = env.next_params(vec![calls::occupy_nonces(avocado, vec![digest])]);
    assert!(env.cast(params, &[&owner]).unwrap().success);

    let signatures = env.sign_cast(&victim, &forward_params, &[&owner]);
    let parameters = env.execute_params(victim, forward_params, signatures);
    let err = env.forwarder.execute(&mut env.chain, &parameters).unwrap_err();
    assert!(matches!(err, AvocadoError::Cast(CastError::InvalidNonce)));
}

#[test]
fn upgrade_is_gated_by_the_registry() {
    let mut env = Env::new();
    let avocado = env.avocado();
    let owner = env.owner.clone();
    let v2 = Address::with_last_byte(0x02);

    // not allowed yet: the action fails, the pointer stays
    let params = env.next_params(vec![calls::upgrade_to(avocado, v2)]);
    let result = env.cast(params, &[&owner]).unwrap();
    assert!(!result.success);
    assert_eq!(env.chain.account(avocado).unwrap().implementation, IMPL_V1);

    // allow it and retry
    env.chain.registry_mut().allow_version(v2);
    let params = env.next_params(vec![calls::upgrade_to(avocado, v2)]);
    assert!(env.cast(params, &[&owner]).unwrap().success);
    assert_eq!(env.chain.account(avocado).unwrap().implementation, v2);
}
