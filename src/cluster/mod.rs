//! Kubernetes API client

mod client;

pub use client::ClusterClient;
