use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoteError {
    /// A vote must carry at least one action.
    #[error("a vote needs at least one action")]
    NoActions,

    /// The creation receipt carried no `StartVote` event.
    #[error("transaction mined but no StartVote event was emitted")]
    MissingStartVote,

    /// The confirmation prompt's input ended before a definite answer.
    #[error("confirmation prompt closed without an answer")]
    PromptClosed,

    /// A post-execution check did not hold.
    #[error("verification failed: {0}")]
    Verification(String),

    #[error("bad vote id {0:?}")]
    BadVoteId(String),

    #[error(transparent)]
    Amount(#[from] omnibus_types::AmountError),

    #[error(transparent)]
    Script(#[from] omnibus_script::ScriptError),

    #[error(transparent)]
    Chain(#[from] omnibus_chain::ChainError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
