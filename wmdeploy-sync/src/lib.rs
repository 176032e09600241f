//! # wmdeploy-sync
//!
//! Script discovery, the create-or-update upload protocol, and the deploy
//! driver.
//!
//! Call [`deploy`] to upload every paired script under the configured root,
//! [`plan`] to see what would be uploaded, or [`write_bundles`] to export
//! YAML bundles instead of talking to the server.

pub mod bundle;
pub mod client;
pub mod discovery;
pub mod error;
pub mod pipeline;

pub use bundle::{write_bundles, BundleResult};
pub use client::{
    classify_create_response, CreateResponse, HttpResponse, ScriptsClient, Transport,
    TransportError, UpsertOutcome, UreqTransport,
};
pub use discovery::{discover, scan_sources, SourceFile};
pub use error::{Stage, SyncError};
pub use pipeline::{deploy, plan, DeployOptions, DeployReport, ItemReport, PlannedScript};
