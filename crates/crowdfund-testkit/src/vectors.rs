//! Scenario vectors for deterministic verification.
//!
//! Each vector is a sequence of instructions against one campaign and the
//! outcome every step must produce. Vectors serialize to JSON so other
//! drivers of the program can replay the same sequences.

use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};

use crowdfund_core::{CampaignError, CampaignStatus};

use crate::fixtures::TestFixture;

/// One instruction in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// The owner creates the campaign.
    Create { target: i64, expect: Expected },
    /// The donor donates to the owner's campaign.
    Donate { amount: i64, expect: Expected },
}

/// Expected outcome of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Expected {
    Accepted { balance: u64, status: CampaignStatus },
    Rejected { error: String },
}

impl Expected {
    fn active(balance: u64) -> Self {
        Expected::Accepted {
            balance,
            status: CampaignStatus::Active,
        }
    }

    fn funded(balance: u64) -> Self {
        Expected::Accepted {
            balance,
            status: CampaignStatus::Funded,
        }
    }

    fn rejected(error: &str) -> Self {
        Expected::Rejected {
            error: error.to_string(),
        }
    }
}

/// A scenario vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioVector {
    /// Human-readable name for the vector.
    pub name: String,
    /// Tokens minted to the donor before the first step.
    pub donor_funds: u64,
    pub steps: Vec<Step>,
}

/// Stable name of a campaign error, as used in vectors.
pub fn error_kind(err: &CampaignError) -> &'static str {
    match err {
        CampaignError::InvalidTarget => "InvalidTarget",
        CampaignError::DescriptionTooLong { .. } => "DescriptionTooLong",
        CampaignError::AmountMustBePositive => "AmountMustBePositive",
        CampaignError::MintMismatch { .. } => "MintMismatch",
        CampaignError::ReceivingAccountMismatch { .. } => "ReceivingAccountMismatch",
        CampaignError::DuplicateCampaign(_) => "DuplicateCampaign",
        CampaignError::CampaignNotFound(_) => "CampaignNotFound",
        CampaignError::ReceivingAccountUnavailable(_) => "ReceivingAccountUnavailable",
        CampaignError::ClosedToDonations => "ClosedToDonations",
        CampaignError::InsufficientFunds { .. } => "InsufficientFunds",
        CampaignError::BalanceOverflow => "BalanceOverflow",
        CampaignError::IntegrityViolation { .. } => "IntegrityViolation",
    }
}

fn vector(name: &str, donor_funds: u64, steps: Vec<Step>) -> ScenarioVector {
    ScenarioVector {
        name: name.to_string(),
        donor_funds,
        steps,
    }
}

fn create(target: i64, expect: Expected) -> Step {
    Step::Create { target, expect }
}

fn donate(amount: i64, expect: Expected) -> Step {
    Step::Donate { amount, expect }
}

/// Get all scenario vectors.
pub fn all_vectors() -> Vec<ScenarioVector> {
    vec![
        vector(
            "target reached then closed",
            1_000,
            vec![
                create(100, Expected::active(0)),
                donate(20, Expected::active(20)),
                donate(50, Expected::active(70)),
                donate(100, Expected::funded(170)),
                donate(20, Expected::rejected("ClosedToDonations")),
            ],
        ),
        vector(
            "exact target",
            100,
            vec![
                create(50, Expected::active(0)),
                donate(50, Expected::funded(50)),
                donate(1, Expected::rejected("ClosedToDonations")),
            ],
        ),
        vector(
            "zero target",
            0,
            vec![create(0, Expected::rejected("InvalidTarget"))],
        ),
        vector(
            "negative target",
            0,
            vec![
                create(-10, Expected::rejected("InvalidTarget")),
                create(1, Expected::active(0)),
            ],
        ),
        vector(
            "non-positive donations",
            10,
            vec![
                create(10, Expected::active(0)),
                donate(0, Expected::rejected("AmountMustBePositive")),
                donate(-3, Expected::rejected("AmountMustBePositive")),
                donate(5, Expected::active(5)),
            ],
        ),
        vector(
            "insufficient funds",
            30,
            vec![
                create(100, Expected::active(0)),
                donate(40, Expected::rejected("InsufficientFunds")),
                donate(30, Expected::active(30)),
            ],
        ),
        vector(
            "duplicate campaign",
            0,
            vec![
                create(10, Expected::active(0)),
                create(20, Expected::rejected("DuplicateCampaign")),
            ],
        ),
        vector(
            "donation before creation",
            10,
            vec![donate(5, Expected::rejected("CampaignNotFound"))],
        ),
    ]
}

/// Replay `vector` against `fixture`, failing at the first divergent step.
///
/// After every step the receiving account must hold exactly the recorded
/// campaign balance.
pub async fn run_vector(fixture: &TestFixture, vector: &ScenarioVector) -> anyhow::Result<()> {
    let owner = fixture.owner(0x01);
    let donor = fixture.donor(0x02, vector.donor_funds)?;

    for (index, step) in vector.steps.iter().enumerate() {
        let (result, expect) = match step {
            Step::Create { target, expect } => (
                fixture
                    .create_campaign(&owner, &vector.name, i128::from(*target))
                    .await,
                expect,
            ),
            Step::Donate { amount, expect } => {
                (fixture.donate(&owner, &donor, i128::from(*amount)).await, expect)
            }
        };

        match (result, expect) {
            (Ok(campaign), Expected::Accepted { balance, status }) => {
                ensure!(
                    campaign.balance == *balance && campaign.status == *status,
                    "{} step {}: got balance {} {:?}, expected {} {:?}",
                    vector.name,
                    index,
                    campaign.balance,
                    campaign.status,
                    balance,
                    status
                );
            }
            (Err(err), Expected::Rejected { error }) => match err.campaign_error() {
                Some(e) if error_kind(e) == error.as_str() => {}
                _ => bail!("{} step {}: got {}, expected {}", vector.name, index, err, error),
            },
            (Ok(campaign), Expected::Rejected { error }) => {
                bail!(
                    "{} step {}: accepted with balance {}, expected {}",
                    vector.name,
                    index,
                    campaign.balance,
                    error
                );
            }
            (Err(err), Expected::Accepted { .. }) => {
                bail!("{} step {}: rejected with {}", vector.name, index, err);
            }
        }

        if let Some(campaign) = fixture.campaign(&owner).await? {
            let observed = fixture.receiving_balance(&owner).await?;
            ensure!(
                observed == campaign.balance,
                "{} step {}: ledger holds {}, record says {}",
                vector.name,
                index,
                observed,
                campaign.balance
            );
        }
    }

    Ok(())
}
