//! # Crowdfund
//!
//! The crowdfund program: a small deterministic state machine that tracks a
//! fundraising campaign's target, balance and status, and mediates token
//! transfers from donors to the campaign's receiving account.
//!
//! ## Overview
//!
//! - **Campaigns** live at addresses derived from their owner, one per owner
//! - **Donations** move tokens through a [`ledger::TokenLedger`] and update the
//!   record in the same transition, or not at all
//! - **Instructions** arrive signed; [`Program::process`] authenticates the
//!   signer and dispatches
//!
//! ## Usage
//!
//! ```rust,no_run
//! use crowdfund::{Program, ProgramConfig};
//! use crowdfund::core::{Instruction, Keypair};
//! use crowdfund::ledger::MemoryLedger;
//!
//! async fn example() {
//!     let ledger = MemoryLedger::new();
//!     let mint = ledger.create_mint(&Keypair::generate().address());
//!
//!     let program = Program::open(ProgramConfig::default(), ledger).unwrap();
//!
//!     let owner = Keypair::generate();
//!     let create = Instruction::CreateCampaign {
//!         description: "community garden".into(),
//!         target: 1_000,
//!         token_mint: mint,
//!     }
//!     .sign(&owner)
//!     .unwrap();
//!
//!     let campaign = program.process(&create).await.unwrap();
//!     assert_eq!(campaign.balance, 0);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `crowdfund::core` - Addresses, derivation, campaign record, instructions
//! - `crowdfund::store` - Record storage and SQLite
//! - `crowdfund::ledger` - Token ledger contract and in-memory ledger

pub mod config;
pub mod error;
pub mod locks;
pub mod program;

// Re-export component crates
pub use crowdfund_core as core;
pub use crowdfund_ledger as ledger;
pub use crowdfund_store as store;

// Re-export main types for convenience
pub use config::ProgramConfig;
pub use error::{ProgramError, Result};
pub use program::Program;

// Re-export commonly used core types
pub use crowdfund_core::{
    Address, Campaign, CampaignError, CampaignStatus, Donation, ErrorClass, Instruction, Keypair,
    SignedInstruction,
};
