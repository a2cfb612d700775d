//! Vote verifier — drive a vote to execution and check what it did.
//!
//! Runs against a dev or forked chain: cast a yea ballot with a holder
//! account, fast-forward past the voting window, execute, then pick the
//! execution receipt apart. One execution marker is emitted per script
//! item, so the marker count must equal the encoded action count, and the
//! domain events between markers carry the per-action evidence the
//! `assert_*` helpers check. Every mismatch is fatal to the run; nothing
//! here retries.

use alloy_primitives::Address;

use omnibus_chain::contracts::Voting;
use omnibus_chain::{ChainClient, ChainEvent, Deployment, Receipt};
use omnibus_types::{AppVersion, Permission, TokenAmount, TxParams, VoteId};

use crate::error::VoteError;

/// Environment variable naming a pre-created vote to verify instead of
/// creating a fresh one.
pub const VOTE_ID_ENV: &str = "OMNIBUS_VOTE_ID";

/// Vote id supplied via [`VOTE_ID_ENV`], if any.
pub fn vote_id_from_env() -> Result<Option<VoteId>, VoteError> {
    match std::env::var(VOTE_ID_ENV) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|id| Some(VoteId::new(id)))
            .map_err(|_| VoteError::BadVoteId(raw)),
        Err(_) => Ok(None),
    }
}

/// Pass and execute a vote: yea ballot from `holder`, fast-forward by
/// `skip` seconds (the contract's full voting window when `None`), then
/// `executeVote`. Returns the execution receipt.
pub fn execute_vote(
    chain: &dyn ChainClient,
    deployment: &Deployment,
    vote_id: VoteId,
    holder: Address,
    skip: Option<u64>,
) -> Result<Receipt, VoteError> {
    let voting = Voting::at(chain, deployment.voting);
    let tx = TxParams::from_sender(holder);

    voting.vote(&tx, vote_id, true, false)?;

    let skip = match skip {
        Some(secs) => secs,
        None => voting.vote_time()?,
    };
    tracing::debug!(%vote_id, skip, "advancing chain time past the voting window");
    chain.advance_time(skip)?;

    if !voting.can_execute(vote_id)? {
        return Err(VoteError::Verification(format!(
            "vote {vote_id} is not executable after the window closed"
        )));
    }
    Ok(voting.execute_vote(&tx, vote_id)?)
}

/// Number of script items the voting app executed in this receipt.
pub fn count_vote_items(receipt: &Receipt, voting: Address) -> usize {
    receipt
        .events
        .iter()
        .filter(|ev| matches!(ev, ChainEvent::ScriptCall { app, .. } if *app == voting))
        .count()
}

/// Bucket the receipt's domain events per executed script item, in order.
///
/// Each execution marker opens a bucket; the events until the next marker
/// belong to that item. Voting-lifecycle events (`CastVote`,
/// `ExecuteVote`, `StartVote`) are bookkeeping, not item effects, and are
/// left out.
pub fn group_domain_events(receipt: &Receipt, voting: Address) -> Vec<Vec<ChainEvent>> {
    let mut groups: Vec<Vec<ChainEvent>> = Vec::new();
    for event in &receipt.events {
        match event {
            ChainEvent::ScriptCall { app, .. } if *app == voting => groups.push(Vec::new()),
            ChainEvent::ScriptCall { .. }
            | ChainEvent::StartVote { .. }
            | ChainEvent::CastVote { .. }
            | ChainEvent::ExecuteVote { .. } => {}
            other => {
                if let Some(current) = groups.last_mut() {
                    current.push(other.clone());
                }
            }
        }
    }
    groups
}

fn verification_err(what: &str, events: &[ChainEvent]) -> VoteError {
    VoteError::Verification(format!("{what}; events: {events:?}"))
}

/// The item granted exactly the given permission tuple and touched no
/// other tuple.
pub fn assert_permission_granted(
    events: &[ChainEvent],
    permission: &Permission,
) -> Result<(), VoteError> {
    assert_permission_set(events, permission, true)
}

/// The item revoked exactly the given permission tuple and touched no
/// other tuple.
pub fn assert_permission_revoked(
    events: &[ChainEvent],
    permission: &Permission,
) -> Result<(), VoteError> {
    assert_permission_set(events, permission, false)
}

fn assert_permission_set(
    events: &[ChainEvent],
    permission: &Permission,
    expect_allowed: bool,
) -> Result<(), VoteError> {
    let mut set_events = events
        .iter()
        .filter(|ev| matches!(ev, ChainEvent::SetPermission { .. }));

    match (set_events.next(), set_events.next()) {
        (
            Some(ChainEvent::SetPermission {
                entity,
                app,
                role,
                allowed,
            }),
            None,
        ) if *entity == permission.entity
            && *app == permission.app
            && *role == permission.role
            && *allowed == expect_allowed =>
        {
            Ok(())
        }
        (_, Some(_)) => Err(verification_err(
            "more than one permission change in one vote item",
            events,
        )),
        _ => Err(verification_err(
            &format!(
                "expected exactly one SetPermission({permission}, allowed={expect_allowed})"
            ),
            events,
        )),
    }
}

/// The item published exactly the given version to the given repo.
pub fn assert_version_pushed(
    events: &[ChainEvent],
    repo: Address,
    version: &AppVersion,
) -> Result<(), VoteError> {
    let matching = events
        .iter()
        .filter(|ev| {
            matches!(ev, ChainEvent::NewVersion { repo: r, version: v } if *r == repo && v == version)
        })
        .count();
    if matching == 1 {
        Ok(())
    } else {
        Err(verification_err(
            &format!("expected exactly one NewVersion({version}) on {repo}"),
            events,
        ))
    }
}

/// The item moved exactly `amount` of `token` to `recipient` with the
/// given payment reference.
pub fn assert_transfer(
    events: &[ChainEvent],
    token: Address,
    recipient: Address,
    amount: TokenAmount,
    reference: &str,
) -> Result<(), VoteError> {
    let transferred = events.iter().any(|ev| {
        matches!(
            ev,
            ChainEvent::Transfer { token: t, to, value, .. }
                if *t == token && *to == recipient && *value == amount.raw()
        )
    });
    if !transferred {
        return Err(verification_err(
            &format!("expected Transfer of {amount} {token} to {recipient}"),
            events,
        ));
    }

    let recorded = events.iter().any(|ev| {
        matches!(
            ev,
            ChainEvent::NewTransaction { entity, amount: a, reference: r }
                if *entity == recipient && *a == amount.raw() && r == reference
        )
    });
    if !recorded {
        return Err(verification_err(
            &format!("expected NewTransaction({amount}, {reference:?}) for {recipient}"),
            events,
        ));
    }
    Ok(())
}

/// The item set exactly the given operator's staking limit.
pub fn assert_staking_limit(
    events: &[ChainEvent],
    operator_id: u64,
    limit: u64,
) -> Result<(), VoteError> {
    let matching = events
        .iter()
        .filter(|ev| {
            matches!(
                ev,
                ChainEvent::StakingLimitSet { operator_id: id, limit: l }
                    if *id == operator_id && *l == limit
            )
        })
        .count();
    if matching == 1 {
        Ok(())
    } else {
        Err(verification_err(
            &format!("expected exactly one StakingLimitSet(#{operator_id}, {limit})"),
            events,
        ))
    }
}

/// The item emitted no domain event (e.g. `setLastDepositBlock`, whose
/// effect is visible only through state reads).
pub fn assert_no_events(events: &[ChainEvent]) -> Result<(), VoteError> {
    if events.is_empty() {
        Ok(())
    } else {
        Err(verification_err("expected an event-less vote item", events))
    }
}
