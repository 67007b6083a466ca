//! ICRC-7 Scenario - Scripted runs against an ICRC-7 ledger
//!
//! A scenario is an ordered list of [`Step`]s played by a fixed cast of
//! named [`Actor`]s. The [`ScenarioRunner`] executes steps one at a time,
//! interprets each ledger response, and reports a [`StepOutcome`] per step.
//!
//! ## Failure model
//!
//! - Ledger rejections are outcomes. A rejection the step did not expect,
//!   or a commit it expected to be refused, is flagged as an assertion
//!   failure and the run continues.
//! - A mint whose metadata image cannot be fetched is skipped.
//! - Transport failures and unknown actor names abort the run.
//!
//! ## Usage
//!
//! ```no_run
//! use icrc7_client::InMemoryLedger;
//! use icrc7_scenario::{
//!     demo_scenario, ActorRegistry, DemoCast, MetadataBuilder, ScenarioRunner, DEFAULT_CAST,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let minter = icrc7_types::Principal::anonymous();
//! let ledger = InMemoryLedger::new(minter);
//! let actors = ActorRegistry::register_all(DEFAULT_CAST, &ledger).await?;
//! let runner = ScenarioRunner::new(Arc::new(actors), "Desmond", MetadataBuilder::without_image()?)?;
//!
//! let summary = runner
//!     .run_scenario(demo_scenario(&DemoCast::default()), |outcome| println!("{}", outcome))
//!     .await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod actor;
pub mod demo;
pub mod error;
pub mod metadata;
pub mod outcome;
pub mod runner;
pub mod step;

pub use actor::{register_actor, Actor, ActorRegistry, NOBODY};
pub use demo::{demo_scenario, DemoCast, DEFAULT_CAST};
pub use error::{ScenarioError, ScenarioResult};
pub use metadata::{encode_image, AssetFetchError, MetadataBuilder, DEFAULT_IMAGE_URL};
pub use outcome::{Observation, ScenarioSummary, StepOutcome, StepStatus};
pub use runner::ScenarioRunner;
pub use step::{Check, Mutation, Query, ScenarioFile, Step};
