//! # Crowdfund Testkit
//!
//! Testing utilities for the crowdfund program.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Scenario vectors**: Donation sequences with the balance and status
//!   every step must produce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A program wired to an in-memory ledger with funded donors
//!
//! ## Scenario Vectors
//!
//! ```rust,no_run
//! use crowdfund_testkit::{all_vectors, run_vector, TestFixture};
//!
//! async fn check() -> anyhow::Result<()> {
//!     for vector in all_vectors() {
//!         let fixture = TestFixture::new();
//!         run_vector(&fixture, &vector).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use crowdfund_testkit::generators::CampaignParams;
//!
//! proptest! {
//!     #[test]
//!     fn campaign_is_valid(params: CampaignParams) {
//!         prop_assert!(params.campaign().is_ok());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use crowdfund_testkit::TestFixture;
//!
//! async fn setup() -> anyhow::Result<()> {
//!     let fixture = TestFixture::new();
//!     let owner = fixture.owner(1);
//!     let donor = fixture.donor(2, 500)?;
//!     fixture.create_campaign(&owner, "roof repair", 100).await?;
//!     fixture.donate(&owner, &donor, 40).await?;
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{Donor, TestFixture};
pub use generators::CampaignParams;
pub use vectors::{all_vectors, run_vector, Expected, ScenarioVector, Step};
