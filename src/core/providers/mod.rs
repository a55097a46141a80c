//! Cloud provider plumbing shared by the speech clients.

pub mod azure;

pub use azure::{AZURE_SUBSCRIPTION_KEY_HEADER, AzureRegion, SpeechEndpoints};
