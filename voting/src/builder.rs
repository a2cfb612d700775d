//! Vote builder — preview, confirmation, submission.
//!
//! A [`VoteBuilder`] collects typed actions in order, packs them into one
//! call script, and submits it through the token manager's forwarding path:
//! the omnibus script becomes the payload of a `newVote` call, which itself
//! rides in a single-call script forwarded by the token manager. The
//! preview an operator confirms is decoded back out of the exact bytes that
//! will go on chain, and the strict decode pass rejects a script that
//! repeats an identical call — for payouts a repeat would double-spend.

use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

use alloy_primitives::Bytes;
use alloy_sol_types::SolCall;

use omnibus_chain::contracts::{abi, TokenManager};
use omnibus_chain::describe::describe_call;
use omnibus_chain::{ChainClient, Deployment, Receipt};
use omnibus_script::{decode_call_script_strict, encode_call_script, EvmCall};
use omnibus_types::{TxParams, VoteId};

use crate::actions::Action;
use crate::error::VoteError;

/// Result of one builder run.
#[derive(Debug)]
pub enum VoteOutcome {
    /// The vote was submitted and exists on chain.
    Created { vote_id: VoteId, receipt: Receipt },
    /// The operator declined the preview; nothing was submitted.
    Declined,
}

/// The operator-confirmation seam.
///
/// The builder hands the rendered preview to `confirm` and submits only on
/// `true`. The terminal implementation is [`StdioConfirm`]; tests supply
/// scripted input.
pub trait Confirm {
    fn confirm(&mut self, preview: &str) -> Result<bool, VoteError>;
}

/// Interactive confirmation over an input/output pair.
///
/// Prints the preview, then repeats the prompt until a definite answer is
/// given: `y`/`yes` or `n`/`no`, case-insensitive. Anything else re-asks;
/// end of input is an error, never a default.
pub struct StdioConfirm<R, W> {
    input: R,
    output: W,
}

impl StdioConfirm<BufReader<Stdin>, Stdout> {
    /// Prompt on the controlling terminal.
    pub fn terminal() -> Self {
        Self {
            input: BufReader::new(std::io::stdin()),
            output: std::io::stdout(),
        }
    }
}

impl<R, W> StdioConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for StdioConfirm<R, W> {
    fn confirm(&mut self, preview: &str) -> Result<bool, VoteError> {
        writeln!(self.output, "{preview}")?;
        writeln!(self.output, "Does it look good?")?;
        loop {
            write!(self.output, "[yes/no] > ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(VoteError::PromptClosed);
            }
            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => continue,
            }
        }
    }
}

/// Assembles one omnibus vote.
pub struct VoteBuilder {
    description: String,
    actions: Vec<Action>,
}

impl VoteBuilder {
    /// `description` becomes the vote metadata shown to token holders.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
        }
    }

    /// Append an action. Script order is push order.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Pack the actions into the omnibus call script.
    pub fn encode_script(&self, deployment: &Deployment) -> Result<Vec<u8>, VoteError> {
        if self.actions.is_empty() {
            return Err(VoteError::NoActions);
        }
        let calls: Vec<EvmCall> = self
            .actions
            .iter()
            .map(|action| action.to_call(deployment))
            .collect();
        Ok(encode_call_script(&calls)?)
    }

    /// Render the decoded preview of the packed script.
    ///
    /// Decodes in strict mode, so a duplicated call surfaces here, before
    /// anything is submitted.
    pub fn preview(&self, deployment: &Deployment) -> Result<String, VoteError> {
        let script = self.encode_script(deployment)?;
        let calls = decode_call_script_strict(&script)?;

        let mut out = String::from("Points of voting:\n");
        let total = calls.len();
        for (index, call) in calls.iter().enumerate() {
            let decoded = describe_call(call)?;
            out.push_str(&format!("Point #{}/{total}.\n", index + 1));
            out.push_str(&decoded.to_string());
            out.push_str("\n---------------------------\n");
        }
        Ok(out)
    }

    /// Submit the vote, optionally gated on operator confirmation.
    ///
    /// With `confirm` set, the rendered preview is shown and a "no" aborts
    /// with [`VoteOutcome::Declined`] — no transaction leaves the process.
    /// `None` submits silently (the verifier's path).
    pub fn submit(
        &self,
        chain: &dyn ChainClient,
        deployment: &Deployment,
        tx: &TxParams,
        confirm: Option<&mut dyn Confirm>,
    ) -> Result<VoteOutcome, VoteError> {
        let omnibus = self.encode_script(deployment)?;
        let preview = self.preview(deployment)?;

        if let Some(confirm) = confirm {
            if !confirm.confirm(&preview)? {
                tracing::info!("operator declined the vote preview");
                return Ok(VoteOutcome::Declined);
            }
        }

        let new_vote = abi::Voting::newVoteCall {
            executionScript: Bytes::from(omnibus),
            metadata: self.description.clone(),
            castVote: false,
            executesIfDecided: false,
        }
        .abi_encode();
        let wrapper = encode_call_script(&[EvmCall::new(deployment.voting, new_vote)])?;

        tracing::info!(
            actions = self.actions.len(),
            from = %tx.from,
            "submitting omnibus vote"
        );
        let receipt =
            TokenManager::at(chain, deployment.token_manager).forward(tx, wrapper)?;
        let vote_id = receipt.vote_id().ok_or(VoteError::MissingStartVote)?;
        tracing::info!(%vote_id, tx_hash = %receipt.tx_hash, "vote created");

        Ok(VoteOutcome::Created { vote_id, receipt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use alloy_primitives::Address;
    use omnibus_chain::NullChain;
    use omnibus_script::ScriptError;
    use omnibus_types::{NetworkId, TokenAmount, VoteId};

    use crate::actions::{StakingLimitChange, TokenTransfer};

    fn holder() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn chain() -> NullChain {
        let chain = NullChain::new(Deployment::for_network(NetworkId::Dev));
        let gov = chain.deployment().gov_token;
        chain.set_total_supply(gov, 1_000_000);
        chain.set_token_balance(gov, holder(), 600_000);
        chain
    }

    fn limit_builder() -> VoteBuilder {
        let mut builder = VoteBuilder::new("raise a staking limit");
        builder.push(Action::StakingLimitChange(StakingLimitChange {
            operator_id: 12,
            limit: 1950,
        }));
        builder
    }

    fn transfer_action(deployment: &Deployment) -> Action {
        Action::TokenTransfer(TokenTransfer {
            token: deployment.gov_token,
            recipient: Address::repeat_byte(0x48),
            amount: TokenAmount::from_units(100),
            reference: "test payout".into(),
        })
    }

    #[test]
    fn test_empty_builder_is_rejected() {
        let chain = chain();
        let builder = VoteBuilder::new("empty");
        let err = builder
            .submit(
                &chain,
                chain.deployment(),
                &TxParams::from_sender(holder()),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, VoteError::NoActions));
    }

    #[test]
    fn test_silent_submit_creates_a_vote() {
        let chain = chain();
        let outcome = limit_builder()
            .submit(
                &chain,
                chain.deployment(),
                &TxParams::from_sender(holder()),
                None,
            )
            .unwrap();

        match outcome {
            VoteOutcome::Created { vote_id, receipt } => {
                assert_eq!(vote_id, VoteId::new(0));
                assert_eq!(receipt.vote_id(), Some(vote_id));
            }
            VoteOutcome::Declined => panic!("silent submit cannot be declined"),
        }
        assert_eq!(chain.vote_count(), 1);
    }

    #[test]
    fn test_declining_submits_nothing() {
        let chain = chain();
        let mut prompt = StdioConfirm::new(Cursor::new("nah\nno\n"), Vec::new());
        let outcome = limit_builder()
            .submit(
                &chain,
                chain.deployment(),
                &TxParams::from_sender(holder()),
                Some(&mut prompt),
            )
            .unwrap();

        assert!(matches!(outcome, VoteOutcome::Declined));
        assert_eq!(chain.vote_count(), 0);
        assert_eq!(chain.tx_count(), 0);
    }

    #[test]
    fn test_prompt_repeats_until_definite_answer() {
        let chain = chain();
        let mut prompt = StdioConfirm::new(Cursor::new("\nmaybe\nY\n"), Vec::new());
        let outcome = limit_builder()
            .submit(
                &chain,
                chain.deployment(),
                &TxParams::from_sender(holder()),
                Some(&mut prompt),
            )
            .unwrap();

        assert!(matches!(outcome, VoteOutcome::Created { .. }));
        assert_eq!(chain.vote_count(), 1);
    }

    #[test]
    fn test_prompt_eof_is_an_error_not_a_yes() {
        let chain = chain();
        let mut prompt = StdioConfirm::new(Cursor::new("hm\n"), Vec::new());
        let err = limit_builder()
            .submit(
                &chain,
                chain.deployment(),
                &TxParams::from_sender(holder()),
                Some(&mut prompt),
            )
            .unwrap_err();

        assert!(matches!(err, VoteError::PromptClosed));
        assert_eq!(chain.vote_count(), 0);
    }

    #[test]
    fn test_preview_numbers_every_point() {
        let chain = chain();
        let d = chain.deployment();
        let mut builder = limit_builder();
        builder.push(transfer_action(d));

        let preview = builder.preview(d).unwrap();
        assert!(preview.contains("Point #1/2."));
        assert!(preview.contains("Point #2/2."));
        assert!(preview.contains("setNodeOperatorStakingLimit"));
        assert!(preview.contains("newImmediatePayment"));
    }

    #[test]
    fn test_duplicate_action_fails_before_submission() {
        let chain = chain();
        let d = chain.deployment();
        let mut builder = VoteBuilder::new("double payout");
        builder.push(transfer_action(d));
        builder.push(transfer_action(d));

        let err = builder
            .submit(&chain, d, &TxParams::from_sender(holder()), None)
            .unwrap_err();
        assert!(matches!(
            err,
            VoteError::Script(ScriptError::DuplicateCall { index: 1, first: 0 })
        ));
        assert_eq!(chain.tx_count(), 0);
    }
}
